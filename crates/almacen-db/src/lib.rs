//! # almacen-db: Database Layer for Almacen POS
//!
//! This crate provides database access for the Almacen POS system.
//! It uses SQLite for local storage with sqlx for async operations.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Almacen POS Data Flow                            │
//! │                                                                         │
//! │  CLI command (almacen sale --customer Ana --item <id>:2)               │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    almacen-db (THIS CRATE)                      │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌───────────────┐    ┌──────────────┐  │   │
//! │  │   │   Database    │    │  Repositories │    │  Migrations  │  │   │
//! │  │   │   (pool.rs)   │    │  product      │    │  (embedded)  │  │   │
//! │  │   │               │◄───│  category     │    │              │  │   │
//! │  │   │ SqlitePool    │    │  brand        │    │ 0001_initial │  │   │
//! │  │   │               │    │  invoice      │    │              │  │   │
//! │  │   └───────┬───────┘    │  dashboard    │    └──────────────┘  │   │
//! │  │           │            └───────────────┘                       │   │
//! │  │           ▼                                                     │   │
//! │  │   ┌───────────────┐                                             │   │
//! │  │   │ SaleProcessor │  one transaction per quick sale             │   │
//! │  │   │   (sale.rs)   │                                             │   │
//! │  │   └───────────────┘                                             │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     SQLite Database                             │   │
//! │  │   ~/.local/share/almacen/almacen.db (platform data dir)         │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`pool`] - Connection pool creation and configuration
//! - [`migrations`] - Embedded database migrations
//! - [`error`] - Database error types
//! - [`repository`] - Repository implementations
//! - [`sale`] - The atomic quick sale
//!
//! ## Usage
//!
//! ```rust,ignore
//! use almacen_db::{Database, DbConfig};
//!
//! let db = Database::new(DbConfig::new("path/to/almacen.db")).await?;
//!
//! let products = db.products().search("galaxy", 20).await?;
//! let invoice_id = db.sales().process_sale(&mut cart, "Ana").await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;
pub mod sale;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{DbError, DbResult};
pub use pool::{Database, DbConfig};
pub use sale::{SaleError, SaleProcessor, SaleResult};

// Repository re-exports for convenience
pub use repository::brand::BrandRepository;
pub use repository::category::CategoryRepository;
pub use repository::dashboard::{DashboardRepository, DashboardSummary};
pub use repository::invoice::InvoiceRepository;
pub use repository::product::ProductRepository;
