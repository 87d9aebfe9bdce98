//! # Sale Commands
//!
//! `sale` builds a cart from `--item` arguments and hands it to the
//! transactional sale processor. `service` records a repair invoice.
//!
//! ## Sale Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  almacen sale --customer Ana --item <id>:2 --item <id>                  │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  parse_item: "<id>:2" → ItemSpec { product, quantity: 2 }              │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Cart::add_item per item (stock checked, repeated ids merge)           │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  SaleProcessor::process_sale (one transaction)                         │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Receipt on stdout                                                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::io::Write;

use clap::Args;

use crate::commands::invoice::write_receipt;
use crate::commands::parse_money;
use crate::commands::product::resolve_product;
use crate::error::{AppError, AppResult};
use crate::AppContext;
use almacen_core::{Cart, Money};

#[derive(Debug, Args)]
pub struct SaleArgs {
    /// Customer name printed on the invoice
    #[arg(short, long)]
    pub customer: String,

    /// Product id or name, optionally followed by :QTY (default 1)
    #[arg(
        short,
        long = "item",
        value_name = "PRODUCT_ID[:QTY]",
        required = true,
        value_parser = parse_item
    )]
    pub items: Vec<ItemSpec>,
}

#[derive(Debug, Args)]
pub struct ServiceArgs {
    /// Customer name printed on the invoice
    #[arg(short, long)]
    pub customer: String,

    /// Amount charged, e.g. 150.00
    #[arg(short, long, value_parser = parse_money)]
    pub amount: Money,

    /// Work performed
    #[arg(short, long)]
    pub description: String,
}

/// One `--item` argument.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemSpec {
    pub product: String,
    pub quantity: i64,
}

/// Parses `PRODUCT[:QTY]`.
///
/// Only a numeric suffix after the last `:` is taken as the quantity, so
/// names containing a colon still resolve.
pub fn parse_item(input: &str) -> Result<ItemSpec, String> {
    let input = input.trim();

    let (product, quantity) = match input.rsplit_once(':') {
        Some((product, "")) => {
            return Err(format!("missing quantity after ':' in '{}'", product));
        }
        Some((product, qty)) => match qty.trim().parse::<i64>() {
            Ok(quantity) => (product.trim(), quantity),
            Err(_) => (input, 1),
        },
        None => (input, 1),
    };

    if product.is_empty() {
        return Err("product is required".to_string());
    }

    Ok(ItemSpec {
        product: product.to_string(),
        quantity,
    })
}

pub async fn run_sale(args: SaleArgs, ctx: &AppContext, out: &mut dyn Write) -> AppResult<()> {
    let mut cart = Cart::new(ctx.config.tax_rate);

    for item in &args.items {
        let product = resolve_product(ctx, &item.product).await?;
        cart.add_item(&product, item.quantity)?;
    }

    let invoice_id = ctx.db.sales().process_sale(&mut cart, &args.customer).await?;
    print_invoice(ctx, out, &invoice_id).await
}

pub async fn run_service(args: ServiceArgs, ctx: &AppContext, out: &mut dyn Write) -> AppResult<()> {
    let invoice_id = ctx
        .db
        .sales()
        .record_service_invoice(&args.customer, args.amount, &args.description)
        .await?;
    print_invoice(ctx, out, &invoice_id).await
}

async fn print_invoice(ctx: &AppContext, out: &mut dyn Write, id: &str) -> AppResult<()> {
    let detail = ctx
        .db
        .invoices()
        .get_with_items(id)
        .await?
        .ok_or_else(|| AppError::not_found("Invoice", id))?;
    write_receipt(ctx, out, &detail)
}
