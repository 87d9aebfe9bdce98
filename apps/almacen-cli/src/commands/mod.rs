//! # Commands Module
//!
//! One module per subcommand. Every handler has the same shape:
//!
//! ```rust,ignore
//! pub async fn run(cmd: XCommand, ctx: &AppContext, out: &mut dyn Write) -> AppResult<()>
//! ```
//!
//! Handlers delegate to `almacen-db` and only format results.
//!
//! ## Command Categories
//!
//! ### Catalog
//! - `product list|search|show|add|update|delete|adjust-stock`
//! - `category list|add|delete`
//! - `brand list|add|delete`
//!
//! ### Sales
//! - `sale` - Quick sale from `PRODUCT_ID[:QTY]` items
//! - `service` - Service invoice, no stock effect
//! - `invoice list|show`
//!
//! ### Reporting
//! - `dashboard`

pub mod brand;
pub mod category;
pub mod dashboard;
pub mod invoice;
pub mod product;
pub mod sale;

use almacen_core::Money;

/// Parses a decimal amount argument such as `80` or `4,500.00`.
pub fn parse_money(input: &str) -> Result<Money, String> {
    Money::parse(input).map_err(|e| e.to_string())
}
