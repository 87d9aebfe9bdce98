//! # Product Repository
//!
//! Database operations for products.
//!
//! ## Key Operations
//! - Catalog CRUD
//! - Substring search over name, model and description
//! - Guarded stock changes (stock never goes below zero)
//!
//! ## Guarded Stock Update
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                    Stock Update Strategy                            │
//! │                                                                     │
//! │  ❌ Read, compute, write (a second writer can slip in between)      │
//! │     SELECT stock ...; UPDATE products SET stock = 7                 │
//! │                                                                     │
//! │  ✅ Delta with a guard in the WHERE clause                          │
//! │     UPDATE products SET stock = stock + ?delta                      │
//! │     WHERE id = ? AND stock + ?delta >= 0                            │
//! │                                                                     │
//! │  rows_affected = 0 → product missing OR not enough stock            │
//! │  (a follow-up SELECT tells the two apart)                           │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::Utc;
use sqlx::{SqliteConnection, SqlitePool};
use tracing::debug;

use crate::error::{DbError, DbResult};
use almacen_core::validation::{validate_product, validate_search_query};
use almacen_core::Product;

const PRODUCT_COLUMNS: &str = "id, name, description, price_cents, stock, category_id, brand_id, \
                               model, created_at, updated_at";

/// Repository for product database operations.
///
/// ## Usage
/// ```rust,ignore
/// let repo = db.products();
///
/// let results = repo.search("iphone", 20).await?;
/// let product = repo.get_by_id("uuid-here").await?;
/// repo.adjust_stock(&product.id, 10).await?;
/// ```
#[derive(Debug, Clone)]
pub struct ProductRepository {
    pool: SqlitePool,
}

impl ProductRepository {
    /// Creates a new ProductRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ProductRepository { pool }
    }

    /// Lists all products ordered by name.
    pub async fn list(&self) -> DbResult<Vec<Product>> {
        let sql = format!("SELECT {PRODUCT_COLUMNS} FROM products ORDER BY name");
        let products = sqlx::query_as::<_, Product>(&sql)
            .fetch_all(&self.pool)
            .await?;

        debug!(count = products.len(), "Listed products");
        Ok(products)
    }

    /// Searches products by a case-insensitive substring of name, model or
    /// description.
    ///
    /// ## Arguments
    /// * `query` - Search term; empty returns the first `limit` products by name
    /// * `limit` - Maximum results to return
    ///
    /// `%` and `_` in the term match literally.
    pub async fn search(&self, query: &str, limit: u32) -> DbResult<Vec<Product>> {
        let query = validate_search_query(query)?;

        debug!(query = %query, limit = %limit, "Searching products");

        let pattern = format!("%{}%", escape_like(&query));
        let sql = format!(
            "SELECT {PRODUCT_COLUMNS} FROM products \
             WHERE name LIKE ?1 ESCAPE '\\' \
                OR model LIKE ?1 ESCAPE '\\' \
                OR description LIKE ?1 ESCAPE '\\' \
             ORDER BY name \
             LIMIT ?2"
        );

        let products = sqlx::query_as::<_, Product>(&sql)
            .bind(pattern)
            .bind(limit)
            .fetch_all(&self.pool)
            .await?;

        debug!(count = products.len(), "Search returned products");
        Ok(products)
    }

    /// Gets a product by its ID.
    ///
    /// ## Returns
    /// * `Ok(Some(Product))` - Product found
    /// * `Ok(None)` - Product not found
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Product>> {
        let mut conn = self.pool.acquire().await?;
        Self::get_by_id_tx(&mut conn, id).await
    }

    /// [`get_by_id`](Self::get_by_id) on a caller-held connection or transaction.
    pub async fn get_by_id_tx(conn: &mut SqliteConnection, id: &str) -> DbResult<Option<Product>> {
        let sql = format!("SELECT {PRODUCT_COLUMNS} FROM products WHERE id = ?1");
        let product = sqlx::query_as::<_, Product>(&sql)
            .bind(id)
            .fetch_optional(conn)
            .await?;

        Ok(product)
    }

    /// Gets a product by its exact name.
    pub async fn get_by_name(&self, name: &str) -> DbResult<Option<Product>> {
        let sql = format!("SELECT {PRODUCT_COLUMNS} FROM products WHERE name = ?1");
        let product = sqlx::query_as::<_, Product>(&sql)
            .bind(name.trim())
            .fetch_optional(&self.pool)
            .await?;

        Ok(product)
    }

    /// Inserts a new product.
    ///
    /// ## Returns
    /// * `Ok(Product)` - The inserted product
    /// * `Err(DbError::UniqueViolation)` - Name already exists
    /// * `Err(DbError::ForeignKeyViolation)` - Unknown category or brand
    pub async fn insert(&self, product: &Product) -> DbResult<Product> {
        validate_product(product)?;

        debug!(id = %product.id, name = %product.name, "Inserting product");

        sqlx::query(
            r#"
            INSERT INTO products (
                id, name, description, price_cents, stock,
                category_id, brand_id, model, created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)
            "#,
        )
        .bind(&product.id)
        .bind(product.name.trim())
        .bind(&product.description)
        .bind(product.price_cents)
        .bind(product.stock)
        .bind(&product.category_id)
        .bind(&product.brand_id)
        .bind(&product.model)
        .bind(product.created_at)
        .bind(product.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| DbError::from(e).with_duplicate_value(&product.name))?;

        let mut inserted = product.clone();
        inserted.name = product.name.trim().to_string();
        Ok(inserted)
    }

    /// Updates every editable field of an existing product and bumps `updated_at`.
    ///
    /// ## Returns
    /// * `Err(DbError::NotFound)` - Product doesn't exist
    pub async fn update(&self, product: &Product) -> DbResult<()> {
        validate_product(product)?;

        debug!(id = %product.id, "Updating product");

        let result = sqlx::query(
            r#"
            UPDATE products SET
                name = ?2,
                description = ?3,
                price_cents = ?4,
                stock = ?5,
                category_id = ?6,
                brand_id = ?7,
                model = ?8,
                updated_at = ?9
            WHERE id = ?1
            "#,
        )
        .bind(&product.id)
        .bind(product.name.trim())
        .bind(&product.description)
        .bind(product.price_cents)
        .bind(product.stock)
        .bind(&product.category_id)
        .bind(&product.brand_id)
        .bind(&product.model)
        .bind(Utc::now())
        .execute(&self.pool)
        .await
        .map_err(|e| DbError::from(e).with_duplicate_value(&product.name))?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Product", &product.id));
        }

        Ok(())
    }

    /// Deletes a product.
    ///
    /// Products that already appear on an invoice are kept by the foreign key
    /// and this returns `DbError::ForeignKeyViolation`.
    pub async fn delete(&self, id: &str) -> DbResult<()> {
        debug!(id = %id, "Deleting product");

        let result = sqlx::query("DELETE FROM products WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Product", id));
        }

        Ok(())
    }

    /// Adds `delta` units to the stock (negative to remove) and returns the
    /// updated product.
    ///
    /// ## Returns
    /// * `Err(DbError::InsufficientStock)` - The change would leave stock below zero
    /// * `Err(DbError::NotFound)` - Product doesn't exist
    pub async fn adjust_stock(&self, id: &str, delta: i64) -> DbResult<Product> {
        debug!(id = %id, delta = %delta, "Adjusting stock");

        let mut conn = self.pool.acquire().await?;
        Self::adjust_stock_tx(&mut conn, id, delta).await?;

        Self::get_by_id_tx(&mut conn, id)
            .await?
            .ok_or_else(|| DbError::not_found("Product", id))
    }

    /// Guarded stock change on a caller-held connection or transaction.
    ///
    /// The quick sale calls this with `-quantity` for each cart line.
    pub async fn adjust_stock_tx(conn: &mut SqliteConnection, id: &str, delta: i64) -> DbResult<()> {
        let result = sqlx::query(
            r#"
            UPDATE products
            SET stock = stock + ?2,
                updated_at = ?3
            WHERE id = ?1 AND stock + ?2 >= 0
            "#,
        )
        .bind(id)
        .bind(delta)
        .bind(Utc::now())
        .execute(&mut *conn)
        .await?;

        if result.rows_affected() == 1 {
            return Ok(());
        }

        match Self::get_by_id_tx(conn, id).await? {
            Some(product) => Err(DbError::InsufficientStock {
                product: product.name,
                available: product.stock,
                requested: -delta,
            }),
            None => Err(DbError::not_found("Product", id)),
        }
    }

    /// Counts products.
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM products")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }

    /// Products with `stock <= threshold`, lowest stock first.
    pub async fn low_stock(&self, threshold: i64) -> DbResult<Vec<Product>> {
        let sql = format!(
            "SELECT {PRODUCT_COLUMNS} FROM products WHERE stock <= ?1 ORDER BY stock, name"
        );
        let products = sqlx::query_as::<_, Product>(&sql)
            .bind(threshold)
            .fetch_all(&self.pool)
            .await?;

        Ok(products)
    }
}

/// Escapes LIKE wildcards so the term matches literally (escape char `\`).
fn escape_like(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len());
    for c in term.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

// =============================================================================
// Unit Tests
// =============================================================================
