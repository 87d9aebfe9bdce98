//! # Category Commands

use std::io::Write;

use clap::Subcommand;
use tracing::info;

use crate::commands::product::resolve_category_id;
use crate::error::{AppError, AppResult};
use crate::AppContext;
use almacen_core::Category;
use almacen_db::DbError;

#[derive(Debug, Subcommand)]
pub enum CategoryCommand {
    /// List categories
    List,

    /// Add a category
    Add {
        #[arg(long)]
        name: String,

        #[arg(long)]
        description: Option<String>,
    },

    /// Delete a category that has no products
    Delete {
        /// Category id or name
        category: String,
    },
}

pub async fn run(cmd: CategoryCommand, ctx: &AppContext, out: &mut dyn Write) -> AppResult<()> {
    match cmd {
        CategoryCommand::List => {
            for c in ctx.db.categories().list().await? {
                match &c.description {
                    Some(description) => {
                        writeln!(out, "{:<36}  {:<20}  {}", c.id, c.name, description)?
                    }
                    None => writeln!(out, "{:<36}  {}", c.id, c.name)?,
                }
            }
            Ok(())
        }
        CategoryCommand::Add { name, description } => {
            let category = ctx
                .db
                .categories()
                .insert(&Category::new(name, description))
                .await?;
            info!(id = %category.id, name = %category.name, "Category added");
            writeln!(out, "Added category {} ({})", category.name, category.id)?;
            Ok(())
        }
        CategoryCommand::Delete { category } => {
            let id = resolve_category_id(ctx, &category).await?;
            match ctx.db.categories().delete(&id).await {
                Ok(()) => {
                    writeln!(out, "Deleted category {}", category)?;
                    Ok(())
                }
                Err(DbError::ForeignKeyViolation { .. }) => Err(AppError::validation(format!(
                    "Category {} still has products",
                    category
                ))),
                Err(e) => Err(e.into()),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::tests::{output, test_context};
    use crate::error::ErrorCode;
    use almacen_core::Product;

    #[tokio::test]
    async fn test_list_includes_seeded_categories() {
        let ctx = test_context().await;
        let mut buf = Vec::new();
        run(CategoryCommand::List, &ctx, &mut buf).await.unwrap();

        let text = output(buf);
        assert!(text.contains("General"));
        assert!(text.contains("Celulares"));
    }

    #[tokio::test]
    async fn test_add_and_delete_by_name() {
        let ctx = test_context().await;
        run(
            CategoryCommand::Add {
                name: "Relojes".to_string(),
                description: Some("Smartwatches".to_string()),
            },
            &ctx,
            &mut Vec::new(),
        )
        .await
        .unwrap();
        assert!(ctx.db.categories().get_by_name("Relojes").await.unwrap().is_some());

        let mut buf = Vec::new();
        run(
            CategoryCommand::Delete {
                category: "Relojes".to_string(),
            },
            &ctx,
            &mut buf,
        )
        .await
        .unwrap();
        assert_eq!(output(buf), "Deleted category Relojes\n");
        assert!(ctx.db.categories().get_by_name("Relojes").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_category_in_use_is_kept() {
        let ctx = test_context().await;
        let tablets = ctx.db.categories().get_by_name("Tablets").await.unwrap().unwrap();
        ctx.db
            .products()
            .insert(&Product::new("iPad Air", 300_000, 3).with_category(tablets.id))
            .await
            .unwrap();

        let err = run(
            CategoryCommand::Delete {
                category: "Tablets".to_string(),
            },
            &ctx,
            &mut Vec::new(),
        )
        .await
        .unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);
        assert!(ctx.db.categories().get_by_name("Tablets").await.unwrap().is_some());
    }
}
