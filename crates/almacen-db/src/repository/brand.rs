//! # Brand Repository
//!
//! Database operations for product brands. Same shape as the category
//! repository, without a description column.

use sqlx::SqlitePool;
use tracing::debug;

use crate::error::{DbError, DbResult};
use almacen_core::validation::validate_brand;
use almacen_core::Brand;

/// Repository for brand database operations.
#[derive(Debug, Clone)]
pub struct BrandRepository {
    pool: SqlitePool,
}

impl BrandRepository {
    pub fn new(pool: SqlitePool) -> Self {
        BrandRepository { pool }
    }

    /// Lists all brands ordered by name.
    pub async fn list(&self) -> DbResult<Vec<Brand>> {
        let brands = sqlx::query_as::<_, Brand>("SELECT id, name FROM brands ORDER BY name")
            .fetch_all(&self.pool)
            .await?;

        Ok(brands)
    }

    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Brand>> {
        let brand = sqlx::query_as::<_, Brand>("SELECT id, name FROM brands WHERE id = ?1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(brand)
    }

    pub async fn get_by_name(&self, name: &str) -> DbResult<Option<Brand>> {
        let brand = sqlx::query_as::<_, Brand>("SELECT id, name FROM brands WHERE name = ?1")
            .bind(name.trim())
            .fetch_optional(&self.pool)
            .await?;

        Ok(brand)
    }

    /// Inserts a brand.
    ///
    /// ## Returns
    /// * `Err(DbError::UniqueViolation)` - Name already exists
    pub async fn insert(&self, brand: &Brand) -> DbResult<Brand> {
        validate_brand(brand)?;

        debug!(name = %brand.name, "Inserting brand");

        let mut inserted = brand.clone();
        inserted.name = brand.name.trim().to_string();

        sqlx::query("INSERT INTO brands (id, name) VALUES (?1, ?2)")
            .bind(&inserted.id)
            .bind(&inserted.name)
            .execute(&self.pool)
            .await
            .map_err(|e| DbError::from(e).with_duplicate_value(&inserted.name))?;

        Ok(inserted)
    }

    /// Renames a brand.
    pub async fn update(&self, brand: &Brand) -> DbResult<()> {
        validate_brand(brand)?;

        debug!(id = %brand.id, "Updating brand");

        let result = sqlx::query("UPDATE brands SET name = ?2 WHERE id = ?1")
            .bind(&brand.id)
            .bind(brand.name.trim())
            .execute(&self.pool)
            .await
            .map_err(|e| DbError::from(e).with_duplicate_value(&brand.name))?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Brand", &brand.id));
        }

        Ok(())
    }

    /// Deletes a brand. Rejected by the foreign key while products use it.
    pub async fn delete(&self, id: &str) -> DbResult<()> {
        debug!(id = %id, "Deleting brand");

        let result = sqlx::query("DELETE FROM brands WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Brand", id));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Database, DbConfig};
    use almacen_core::{Product, DEFAULT_BRAND_ID};

    #[tokio::test]
    async fn test_brand_crud() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.brands();

        let nokia = repo.insert(&Brand::new("Nokia")).await.unwrap();
        assert!(repo.list().await.unwrap().iter().any(|b| b.name == "Nokia"));

        let renamed = Brand {
            id: nokia.id.clone(),
            name: "HMD".to_string(),
        };
        repo.update(&renamed).await.unwrap();
        assert_eq!(repo.get_by_id(&nokia.id).await.unwrap().unwrap().name, "HMD");

        let err = repo
            .update(&Brand {
                id: nokia.id.clone(),
                name: "Apple".to_string(),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::UniqueViolation { ref value, .. } if value == "Apple"));

        repo.delete(&nokia.id).await.unwrap();
        assert!(repo.get_by_name("HMD").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_default_brand_in_use_cannot_be_deleted() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        db.products()
            .insert(&Product::new("Cable USB-C", 1500, 40))
            .await
            .unwrap();

        let err = db.brands().delete(DEFAULT_BRAND_ID).await.unwrap_err();
        assert!(matches!(err, DbError::ForeignKeyViolation { .. }));
    }
}
