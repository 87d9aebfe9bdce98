//! # Product Commands
//!
//! Catalog maintenance and stock adjustments.
//!
//! Products, categories and brands may be referred to by id or by exact name.

use std::io::Write;

use clap::{Args, Subcommand};
use tracing::info;

use crate::commands::parse_money;
use crate::error::{AppError, AppResult};
use crate::AppContext;
use almacen_core::{Money, Product, LOW_STOCK_THRESHOLD};
use almacen_db::DbError;

#[derive(Debug, Subcommand)]
pub enum ProductCommand {
    /// List products ordered by name
    List {
        /// Only products at or below the low-stock threshold
        #[arg(long)]
        low_stock: bool,
    },

    /// Search by name, model or description
    Search {
        query: String,

        #[arg(short, long, default_value_t = 20)]
        limit: u32,
    },

    /// Show one product
    Show {
        /// Product id or name
        product: String,
    },

    /// Add a product
    Add(AddProductArgs),

    /// Change product fields
    Update(UpdateProductArgs),

    /// Delete a product that has never been sold
    Delete {
        /// Product id or name
        product: String,
    },

    /// Add (or with a negative number remove) units of stock
    AdjustStock {
        /// Product id or name
        product: String,

        #[arg(allow_hyphen_values = true)]
        delta: i64,
    },
}

#[derive(Debug, Args)]
pub struct AddProductArgs {
    #[arg(long)]
    pub name: String,

    /// Unit price, e.g. 80.00
    #[arg(long, value_parser = parse_money)]
    pub price: Money,

    #[arg(long, default_value_t = 0)]
    pub stock: i64,

    /// Category id or name (default: General)
    #[arg(long)]
    pub category: Option<String>,

    /// Brand id or name (default: General)
    #[arg(long)]
    pub brand: Option<String>,

    #[arg(long)]
    pub model: Option<String>,

    #[arg(long)]
    pub description: Option<String>,
}

#[derive(Debug, Args)]
pub struct UpdateProductArgs {
    /// Product id or name
    pub product: String,

    #[arg(long)]
    pub name: Option<String>,

    #[arg(long, value_parser = parse_money)]
    pub price: Option<Money>,

    /// Absolute stock count; use adjust-stock for relative changes
    #[arg(long)]
    pub stock: Option<i64>,

    #[arg(long)]
    pub category: Option<String>,

    #[arg(long)]
    pub brand: Option<String>,

    #[arg(long)]
    pub model: Option<String>,

    #[arg(long)]
    pub description: Option<String>,
}

pub async fn run(cmd: ProductCommand, ctx: &AppContext, out: &mut dyn Write) -> AppResult<()> {
    match cmd {
        ProductCommand::List { low_stock } => {
            let products = if low_stock {
                ctx.db.products().low_stock(LOW_STOCK_THRESHOLD).await?
            } else {
                ctx.db.products().list().await?
            };
            write_table(ctx, out, &products)
        }
        ProductCommand::Search { query, limit } => {
            let products = ctx.db.products().search(&query, limit).await?;
            write_table(ctx, out, &products)
        }
        ProductCommand::Show { product } => {
            let product = resolve_product(ctx, &product).await?;
            write_detail(ctx, out, &product).await
        }
        ProductCommand::Add(args) => add(args, ctx, out).await,
        ProductCommand::Update(args) => update(args, ctx, out).await,
        ProductCommand::Delete { product } => {
            let product = resolve_product(ctx, &product).await?;
            match ctx.db.products().delete(&product.id).await {
                Ok(()) => {}
                Err(DbError::ForeignKeyViolation { .. }) => {
                    return Err(AppError::validation(format!(
                        "{} appears on invoices and cannot be deleted",
                        product.name
                    )))
                }
                Err(e) => return Err(e.into()),
            }
            info!(id = %product.id, "Product deleted");
            writeln!(out, "Deleted {}", product.name)?;
            Ok(())
        }
        ProductCommand::AdjustStock { product, delta } => {
            let product = resolve_product(ctx, &product).await?;
            let updated = ctx.db.products().adjust_stock(&product.id, delta).await?;
            writeln!(
                out,
                "{}: stock {} -> {} ({})",
                updated.name,
                product.stock,
                updated.stock,
                updated.stock_status().label()
            )?;
            Ok(())
        }
    }
}

async fn add(args: AddProductArgs, ctx: &AppContext, out: &mut dyn Write) -> AppResult<()> {
    let mut product = Product::new(args.name, args.price.cents(), args.stock);

    if let Some(category) = args.category {
        product.category_id = resolve_category_id(ctx, &category).await?;
    }
    if let Some(brand) = args.brand {
        product.brand_id = resolve_brand_id(ctx, &brand).await?;
    }
    product.model = args.model;
    product.description = args.description;

    let inserted = ctx.db.products().insert(&product).await?;
    info!(id = %inserted.id, name = %inserted.name, "Product added");

    writeln!(out, "Added {} ({})", inserted.name, inserted.id)?;
    Ok(())
}

async fn update(args: UpdateProductArgs, ctx: &AppContext, out: &mut dyn Write) -> AppResult<()> {
    let mut product = resolve_product(ctx, &args.product).await?;

    if let Some(name) = args.name {
        product.name = name;
    }
    if let Some(price) = args.price {
        product.price_cents = price.cents();
    }
    if let Some(stock) = args.stock {
        product.stock = stock;
    }
    if let Some(category) = args.category {
        product.category_id = resolve_category_id(ctx, &category).await?;
    }
    if let Some(brand) = args.brand {
        product.brand_id = resolve_brand_id(ctx, &brand).await?;
    }
    if let Some(model) = args.model {
        product.model = Some(model).filter(|m| !m.trim().is_empty());
    }
    if let Some(description) = args.description {
        product.description = Some(description).filter(|d| !d.trim().is_empty());
    }

    ctx.db.products().update(&product).await?;
    writeln!(out, "Updated {}", product.name.trim())?;
    Ok(())
}

/// Finds a product by id, falling back to an exact name match.
pub(crate) async fn resolve_product(ctx: &AppContext, key: &str) -> AppResult<Product> {
    let products = ctx.db.products();
    if let Some(product) = products.get_by_id(key).await? {
        return Ok(product);
    }
    products
        .get_by_name(key)
        .await?
        .ok_or_else(|| AppError::not_found("Product", key))
}

pub(crate) async fn resolve_category_id(ctx: &AppContext, key: &str) -> AppResult<String> {
    let categories = ctx.db.categories();
    if let Some(category) = categories.get_by_id(key).await? {
        return Ok(category.id);
    }
    categories
        .get_by_name(key)
        .await?
        .map(|c| c.id)
        .ok_or_else(|| AppError::not_found("Category", key))
}

pub(crate) async fn resolve_brand_id(ctx: &AppContext, key: &str) -> AppResult<String> {
    let brands = ctx.db.brands();
    if let Some(brand) = brands.get_by_id(key).await? {
        return Ok(brand.id);
    }
    brands
        .get_by_name(key)
        .await?
        .map(|b| b.id)
        .ok_or_else(|| AppError::not_found("Brand", key))
}

fn write_table(ctx: &AppContext, out: &mut dyn Write, products: &[Product]) -> AppResult<()> {
    if products.is_empty() {
        writeln!(out, "No products found.")?;
        return Ok(());
    }

    writeln!(
        out,
        "{:<36}  {:<30}  {:>12}  {:>6}  STATUS",
        "ID", "NAME", "PRICE", "STOCK"
    )?;
    for p in products {
        writeln!(
            out,
            "{:<36}  {:<30}  {:>12}  {:>6}  {}",
            p.id,
            p.name,
            ctx.config.format_currency(p.price()),
            p.stock,
            p.stock_status().label()
        )?;
    }
    Ok(())
}

async fn write_detail(ctx: &AppContext, out: &mut dyn Write, p: &Product) -> AppResult<()> {
    let category = ctx
        .db
        .categories()
        .get_by_id(&p.category_id)
        .await?
        .map(|c| c.name)
        .unwrap_or_else(|| p.category_id.clone());
    let brand = ctx
        .db
        .brands()
        .get_by_id(&p.brand_id)
        .await?
        .map(|b| b.name)
        .unwrap_or_else(|| p.brand_id.clone());

    writeln!(out, "{}", p.name)?;
    writeln!(out, "  id:          {}", p.id)?;
    writeln!(out, "  price:       {}", ctx.config.format_currency(p.price()))?;
    writeln!(out, "  stock:       {} ({})", p.stock, p.stock_status().label())?;
    writeln!(out, "  value:       {}", ctx.config.format_currency(p.stock_value()))?;
    writeln!(out, "  category:    {}", category)?;
    writeln!(out, "  brand:       {}", brand)?;
    if let Some(model) = &p.model {
        writeln!(out, "  model:       {}", model)?;
    }
    if let Some(description) = &p.description {
        writeln!(out, "  description: {}", description)?;
    }
    writeln!(out, "  updated:     {}", p.updated_at.format("%Y-%m-%d %H:%M"))?;
    Ok(())
}
