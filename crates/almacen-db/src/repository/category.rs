//! # Category Repository
//!
//! Database operations for product categories.

use sqlx::SqlitePool;
use tracing::debug;

use crate::error::{DbError, DbResult};
use almacen_core::validation::validate_category;
use almacen_core::Category;

/// Repository for category database operations.
#[derive(Debug, Clone)]
pub struct CategoryRepository {
    pool: SqlitePool,
}

impl CategoryRepository {
    /// Creates a new CategoryRepository.
    pub fn new(pool: SqlitePool) -> Self {
        CategoryRepository { pool }
    }

    /// Lists all categories ordered by name.
    pub async fn list(&self) -> DbResult<Vec<Category>> {
        let categories = sqlx::query_as::<_, Category>(
            "SELECT id, name, description FROM categories ORDER BY name",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(categories)
    }

    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Category>> {
        let category = sqlx::query_as::<_, Category>(
            "SELECT id, name, description FROM categories WHERE id = ?1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(category)
    }

    pub async fn get_by_name(&self, name: &str) -> DbResult<Option<Category>> {
        let category = sqlx::query_as::<_, Category>(
            "SELECT id, name, description FROM categories WHERE name = ?1",
        )
        .bind(name.trim())
        .fetch_optional(&self.pool)
        .await?;

        Ok(category)
    }

    /// Inserts a category.
    ///
    /// ## Returns
    /// * `Err(DbError::UniqueViolation)` - Name already exists
    pub async fn insert(&self, category: &Category) -> DbResult<Category> {
        validate_category(category)?;

        debug!(name = %category.name, "Inserting category");

        let mut inserted = category.clone();
        inserted.name = category.name.trim().to_string();

        sqlx::query("INSERT INTO categories (id, name, description) VALUES (?1, ?2, ?3)")
            .bind(&inserted.id)
            .bind(&inserted.name)
            .bind(&inserted.description)
            .execute(&self.pool)
            .await
            .map_err(|e| DbError::from(e).with_duplicate_value(&inserted.name))?;

        Ok(inserted)
    }

    /// Renames a category or changes its description.
    pub async fn update(&self, category: &Category) -> DbResult<()> {
        validate_category(category)?;

        debug!(id = %category.id, "Updating category");

        let result = sqlx::query("UPDATE categories SET name = ?2, description = ?3 WHERE id = ?1")
            .bind(&category.id)
            .bind(category.name.trim())
            .bind(&category.description)
            .execute(&self.pool)
            .await
            .map_err(|e| DbError::from(e).with_duplicate_value(&category.name))?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Category", &category.id));
        }

        Ok(())
    }

    /// Deletes a category.
    ///
    /// A category that still has products is kept by the foreign key and this
    /// returns `DbError::ForeignKeyViolation`.
    pub async fn delete(&self, id: &str) -> DbResult<()> {
        debug!(id = %id, "Deleting category");

        let result = sqlx::query("DELETE FROM categories WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Category", id));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Database, DbConfig};
    use almacen_core::Product;

    #[tokio::test]
    async fn test_category_crud() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.categories();

        let created = repo
            .insert(&Category::new("  Cámaras ", Some("Fotografía".to_string())))
            .await
            .unwrap();
        assert_eq!(created.name, "Cámaras");

        let mut found = repo.get_by_name("Cámaras").await.unwrap().unwrap();
        assert_eq!(found.id, created.id);

        found.name = "Cámaras y video".to_string();
        repo.update(&found).await.unwrap();
        let found = repo.get_by_id(&created.id).await.unwrap().unwrap();
        assert_eq!(found.name, "Cámaras y video");

        repo.delete(&created.id).await.unwrap();
        assert!(repo.get_by_id(&created.id).await.unwrap().is_none());
        assert!(matches!(
            repo.delete(&created.id).await,
            Err(DbError::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn test_duplicate_category_rejected() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();

        let err = db
            .categories()
            .insert(&Category::new("Celulares", None))
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::UniqueViolation { .. }));
    }

    #[tokio::test]
    async fn test_referenced_category_cannot_be_deleted() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let category = db
            .categories()
            .insert(&Category::new("Drones", None))
            .await
            .unwrap();
        db.products()
            .insert(&Product::new("DJI Mini 4", 300_000, 2).with_category(&category.id))
            .await
            .unwrap();

        let err = db.categories().delete(&category.id).await.unwrap_err();
        assert!(matches!(err, DbError::ForeignKeyViolation { .. }));
    }
}
