//! # Invoice Repository
//!
//! Database operations for invoices and invoice items.
//!
//! ## Invoice Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Invoice Lifecycle                                 │
//! │                                                                         │
//! │  SALE (inside the SaleProcessor transaction)                           │
//! │     create_tx()    → invoices row (subtotal, tax, total)               │
//! │     add_item_tx()  → invoice_items row per cart line                   │
//! │     commit                                                             │
//! │                                                                         │
//! │  SERVICE                                                               │
//! │     create()       → invoices row with a description, no items         │
//! │                                                                         │
//! │  READ                                                                  │
//! │     list() newest first, get_by_id(), get_items(), get_with_items()    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Invoices are never updated or deleted once written.

use sqlx::{SqliteConnection, SqlitePool};
use tracing::debug;

use crate::error::DbResult;
use almacen_core::{Invoice, InvoiceDetail, InvoiceItem};

const INVOICE_COLUMNS: &str = "id, invoice_date, customer_name, subtotal_cents, tax_cents, \
                               total_cents, invoice_type, description";

const ITEM_COLUMNS: &str =
    "id, invoice_id, product_id, line_no, product_name, quantity, unit_price_cents";

/// Repository for invoice database operations.
#[derive(Debug, Clone)]
pub struct InvoiceRepository {
    pool: SqlitePool,
}

impl InvoiceRepository {
    /// Creates a new InvoiceRepository.
    pub fn new(pool: SqlitePool) -> Self {
        InvoiceRepository { pool }
    }

    /// Inserts an invoice header and returns its id.
    pub async fn create(&self, invoice: &Invoice) -> DbResult<String> {
        let mut conn = self.pool.acquire().await?;
        Self::create_tx(&mut conn, invoice).await
    }

    /// [`create`](Self::create) on a caller-held connection or transaction.
    pub async fn create_tx(conn: &mut SqliteConnection, invoice: &Invoice) -> DbResult<String> {
        debug!(
            id = %invoice.id,
            invoice_type = %invoice.invoice_type,
            total_cents = invoice.total_cents,
            "Inserting invoice"
        );

        sqlx::query(
            r#"
            INSERT INTO invoices (
                id, invoice_date, customer_name,
                subtotal_cents, tax_cents, total_cents,
                invoice_type, description
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
            "#,
        )
        .bind(&invoice.id)
        .bind(invoice.invoice_date)
        .bind(&invoice.customer_name)
        .bind(invoice.subtotal_cents)
        .bind(invoice.tax_cents)
        .bind(invoice.total_cents)
        .bind(invoice.invoice_type)
        .bind(&invoice.description)
        .execute(conn)
        .await?;

        Ok(invoice.id.clone())
    }

    /// Inserts one invoice item.
    ///
    /// ## Snapshot Pattern
    /// The product name and unit price are stored on the item, so the receipt
    /// stays the same after the product is renamed or repriced.
    pub async fn add_item(&self, item: &InvoiceItem) -> DbResult<()> {
        let mut conn = self.pool.acquire().await?;
        Self::add_item_tx(&mut conn, item).await
    }

    /// [`add_item`](Self::add_item) on a caller-held connection or transaction.
    pub async fn add_item_tx(conn: &mut SqliteConnection, item: &InvoiceItem) -> DbResult<()> {
        debug!(
            invoice_id = %item.invoice_id,
            product_id = %item.product_id,
            quantity = item.quantity,
            "Adding invoice item"
        );

        sqlx::query(
            r#"
            INSERT INTO invoice_items (
                id, invoice_id, product_id, line_no,
                product_name, quantity, unit_price_cents
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            "#,
        )
        .bind(&item.id)
        .bind(&item.invoice_id)
        .bind(&item.product_id)
        .bind(item.line_no)
        .bind(&item.product_name)
        .bind(item.quantity)
        .bind(item.unit_price_cents)
        .execute(conn)
        .await?;

        Ok(())
    }

    /// Lists invoices, newest first.
    pub async fn list(&self, limit: u32) -> DbResult<Vec<Invoice>> {
        let mut conn = self.pool.acquire().await?;
        Self::list_tx(&mut conn, limit).await
    }

    /// [`list`](Self::list) on a caller-held connection or transaction.
    pub async fn list_tx(conn: &mut SqliteConnection, limit: u32) -> DbResult<Vec<Invoice>> {
        let sql = format!(
            "SELECT {INVOICE_COLUMNS} FROM invoices \
             ORDER BY invoice_date DESC, rowid DESC \
             LIMIT ?1"
        );
        let invoices = sqlx::query_as::<_, Invoice>(&sql)
            .bind(limit)
            .fetch_all(conn)
            .await?;

        Ok(invoices)
    }

    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Invoice>> {
        let sql = format!("SELECT {INVOICE_COLUMNS} FROM invoices WHERE id = ?1");
        let invoice = sqlx::query_as::<_, Invoice>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(invoice)
    }

    /// Items of an invoice in sale order.
    pub async fn get_items(&self, invoice_id: &str) -> DbResult<Vec<InvoiceItem>> {
        let sql = format!(
            "SELECT {ITEM_COLUMNS} FROM invoice_items WHERE invoice_id = ?1 ORDER BY line_no"
        );
        let items = sqlx::query_as::<_, InvoiceItem>(&sql)
            .bind(invoice_id)
            .fetch_all(&self.pool)
            .await?;

        Ok(items)
    }

    /// Invoice header plus items, as printed on a receipt.
    pub async fn get_with_items(&self, id: &str) -> DbResult<Option<InvoiceDetail>> {
        let Some(invoice) = self.get_by_id(id).await? else {
            return Ok(None);
        };
        let items = self.get_items(id).await?;

        Ok(Some(InvoiceDetail { invoice, items }))
    }

    /// Counts invoices.
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM invoices")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Database, DbConfig, DbError};
    use almacen_core::{InvoiceType, Product};
    use chrono::{Duration, Utc};
    use uuid::Uuid;

    fn invoice(customer: &str, subtotal: i64, tax: i64) -> Invoice {
        Invoice {
            id: Uuid::new_v4().to_string(),
            invoice_date: Utc::now(),
            customer_name: customer.to_string(),
            subtotal_cents: subtotal,
            tax_cents: tax,
            total_cents: subtotal + tax,
            invoice_type: InvoiceType::Sale,
            description: None,
        }
    }

    fn item(invoice_id: &str, product: &Product, line_no: i64, quantity: i64) -> InvoiceItem {
        InvoiceItem {
            id: Uuid::new_v4().to_string(),
            invoice_id: invoice_id.to_string(),
            product_id: product.id.clone(),
            line_no,
            product_name: product.name.clone(),
            quantity,
            unit_price_cents: product.price_cents,
        }
    }

    #[tokio::test]
    async fn test_create_and_read_back() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let funda = db
            .products()
            .insert(&Product::new("Funda", 8000, 100))
            .await
            .unwrap();
        let cable = db
            .products()
            .insert(&Product::new("Cable", 1500, 100))
            .await
            .unwrap();

        let header = invoice("Ana", 17_500, 2_800);
        let id = db.invoices().create(&header).await.unwrap();
        db.invoices().add_item(&item(&id, &funda, 1, 2)).await.unwrap();
        db.invoices().add_item(&item(&id, &cable, 2, 1)).await.unwrap();

        let detail = db.invoices().get_with_items(&id).await.unwrap().unwrap();
        assert_eq!(detail.invoice.customer_name, "Ana");
        assert_eq!(detail.invoice.total_cents, 20_300);
        assert_eq!(detail.invoice.invoice_type, InvoiceType::Sale);
        assert_eq!(detail.items.len(), 2);
        assert_eq!(detail.items[0].product_name, "Funda");
        assert_eq!(detail.items[1].product_name, "Cable");
        assert!(detail.is_consistent());

        assert!(db.invoices().get_with_items("missing").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_list_newest_first() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.invoices();

        let mut older = invoice("Primero", 100, 16);
        older.invoice_date = Utc::now() - Duration::days(1);
        let newer = invoice("Segundo", 200, 32);
        repo.create(&older).await.unwrap();
        repo.create(&newer).await.unwrap();

        let listed = repo.list(10).await.unwrap();
        let names: Vec<&str> = listed.iter().map(|i| i.customer_name.as_str()).collect();
        assert_eq!(names, ["Segundo", "Primero"]);
        assert_eq!(repo.list(1).await.unwrap().len(), 1);
        assert_eq!(repo.count().await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_inconsistent_total_rejected_by_schema() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let mut bad = invoice("Ana", 100, 16);
        bad.total_cents = 999;

        let err = db.invoices().create(&bad).await.unwrap_err();
        assert!(matches!(err, DbError::CheckViolation { .. }));
    }

    #[tokio::test]
    async fn test_zero_quantity_item_rejected_by_schema() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let product = db
            .products()
            .insert(&Product::new("Funda", 8000, 1))
            .await
            .unwrap();
        let id = db.invoices().create(&invoice("Ana", 0, 0)).await.unwrap();

        let err = db
            .invoices()
            .add_item(&item(&id, &product, 1, 0))
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::CheckViolation { .. }));
    }
}
