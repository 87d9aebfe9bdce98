//! # almacen-core: Pure Business Logic for Almacen POS
//!
//! This crate holds the business rules of the store as pure functions and
//! plain data types. Nothing in here touches the database, the file system or
//! the terminal.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Almacen POS Architecture                          │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    almacen-cli (commands)                       │   │
//! │  │    product add/search, sale, service, invoice show, dashboard   │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │              ★ almacen-core (THIS CRATE) ★                      │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   types   │  │   money   │  │   cart    │  │ validation│  │   │
//! │  │   │  Product  │  │   Money   │  │   Cart    │  │   rules   │  │   │
//! │  │   │  Invoice  │  │  TaxRate  │  │ CartLine  │  │  checks   │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • PURE FUNCTIONS                         │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                  almacen-db (Database Layer)                    │   │
//! │  │        SQLite queries, migrations, repositories, sales          │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Product, Category, Brand, Invoice, ...)
//! - [`money`] - Money type with integer arithmetic (no floating point!)
//! - [`cart`] - Quick-sale cart and its totals
//! - [`error`] - Domain error types
//! - [`validation`] - Business rule validation
//!
//! ## Example Usage
//!
//! ```rust
//! use almacen_core::money::Money;
//! use almacen_core::types::TaxRate;
//!
//! let subtotal = Money::from_cents(2500); // $25.00
//! let tax = subtotal.calculate_tax(TaxRate::from_bps(1600)); // 16%
//! assert_eq!(tax.cents(), 400);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod cart;
pub mod error;
pub mod money;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use cart::{Cart, CartLine, CartTotals};
pub use error::{CoreError, CoreResult, ValidationError};
pub use money::Money;
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Well-known id of the `General` category created by the initial migration.
///
/// Products created without an explicit category land here.
pub const DEFAULT_CATEGORY_ID: &str = "00000000-0000-0000-0000-000000000001";

/// Well-known id of the `General` brand created by the initial migration.
pub const DEFAULT_BRAND_ID: &str = "00000000-0000-0000-0000-000000000001";

/// Quick-sale tax rate in basis points (16%).
pub const DEFAULT_TAX_RATE_BPS: u32 = 1600;

/// Products at or below this many units are reported as low stock.
pub const LOW_STOCK_THRESHOLD: i64 = 10;
