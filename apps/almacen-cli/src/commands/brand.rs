//! # Brand Commands

use std::io::Write;

use clap::Subcommand;
use tracing::info;

use crate::commands::product::resolve_brand_id;
use crate::error::{AppError, AppResult};
use crate::AppContext;
use almacen_core::Brand;
use almacen_db::DbError;

#[derive(Debug, Subcommand)]
pub enum BrandCommand {
    /// List brands
    List,

    /// Add a brand
    Add {
        #[arg(long)]
        name: String,
    },

    /// Delete a brand that has no products
    Delete {
        /// Brand id or name
        brand: String,
    },
}

pub async fn run(cmd: BrandCommand, ctx: &AppContext, out: &mut dyn Write) -> AppResult<()> {
    match cmd {
        BrandCommand::List => {
            for b in ctx.db.brands().list().await? {
                writeln!(out, "{:<36}  {}", b.id, b.name)?;
            }
            Ok(())
        }
        BrandCommand::Add { name } => {
            let brand = ctx.db.brands().insert(&Brand::new(name)).await?;
            info!(id = %brand.id, name = %brand.name, "Brand added");
            writeln!(out, "Added brand {} ({})", brand.name, brand.id)?;
            Ok(())
        }
        BrandCommand::Delete { brand } => {
            let id = resolve_brand_id(ctx, &brand).await?;
            match ctx.db.brands().delete(&id).await {
                Ok(()) => {
                    writeln!(out, "Deleted brand {}", brand)?;
                    Ok(())
                }
                Err(DbError::ForeignKeyViolation { .. }) => Err(AppError::validation(format!(
                    "Brand {} still has products",
                    brand
                ))),
                Err(e) => Err(e.into()),
            }
        }
    }
}
