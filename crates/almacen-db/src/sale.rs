//! # Quick Sale
//!
//! Turns a cart into a persisted invoice and decrements stock, all in one
//! SQLite transaction.
//!
//! ## Sale Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        process_sale(cart, customer)                     │
//! │                                                                         │
//! │  Empty ──► validate: cart non-empty, customer non-blank                │
//! │              │ (Validation error, nothing touched)                     │
//! │              ▼                                                          │
//! │  Validated ──► totals = cart.totals()                                  │
//! │              │                                                          │
//! │              ▼                                                          │
//! │           BEGIN                                                         │
//! │              ├── INSERT invoices (SALE, subtotal, tax, total)          │
//! │              └── for each line, in cart order:                         │
//! │                    INSERT invoice_items (name/price snapshot)          │
//! │                    UPDATE products SET stock = stock - qty             │
//! │                      WHERE id = ? AND stock - qty >= 0                 │
//! │              │                                                          │
//! │       ┌──────┴───────┐                                                  │
//! │       ▼              ▼                                                  │
//! │    COMMIT         ROLLBACK (any error)                                  │
//! │    cart.clear()   cart untouched, no invoice, no items, stock as before │
//! │    Committed      RolledBack                                            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every `SaleError` returned by the processor means nothing was written.

use chrono::Utc;
use sqlx::{SqliteConnection, SqlitePool};
use thiserror::Error;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use crate::error::{DbError, DbResult};
use crate::repository::invoice::InvoiceRepository;
use crate::repository::product::ProductRepository;
use almacen_core::validation::{
    validate_customer_name, validate_service_amount, validate_service_description,
};
use almacen_core::{Cart, CoreError, Invoice, InvoiceItem, InvoiceType, Money, ValidationError};

// =============================================================================
// Sale Error
// =============================================================================

/// Errors returned by the quick sale.
#[derive(Debug, Error)]
pub enum SaleError {
    /// Business rule rejection: empty cart, blank customer, stock ran out.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// Persistence failure. The transaction was rolled back.
    #[error(transparent)]
    Db(DbError),
}

impl From<ValidationError> for SaleError {
    fn from(err: ValidationError) -> Self {
        SaleError::Core(CoreError::Validation(err))
    }
}

impl From<DbError> for SaleError {
    /// Stock shortfalls found at commit time are business errors, not storage ones.
    fn from(err: DbError) -> Self {
        match err {
            DbError::InsufficientStock {
                product,
                available,
                requested,
            } => SaleError::Core(CoreError::InsufficientStock {
                product,
                available,
                requested,
            }),
            DbError::Validation(v) => SaleError::Core(CoreError::Validation(v)),
            other => SaleError::Db(other),
        }
    }
}

pub type SaleResult<T> = Result<T, SaleError>;

// =============================================================================
// Sale Processor
// =============================================================================

/// Records sales and service invoices.
#[derive(Debug, Clone)]
pub struct SaleProcessor {
    pool: SqlitePool,
}

impl SaleProcessor {
    pub fn new(pool: SqlitePool) -> Self {
        SaleProcessor { pool }
    }

    /// Persists the cart as a SALE invoice and returns the invoice id.
    ///
    /// On success the cart is cleared. On any error the cart is left as it
    /// was and the database is unchanged.
    ///
    /// ## Errors
    /// - `Core(Validation)` - empty cart or blank customer name
    /// - `Core(InsufficientStock)` - a product no longer has enough units
    /// - `Db(NotFound)` - a product in the cart was deleted
    /// - `Db(..)` - any other storage failure
    pub async fn process_sale(&self, cart: &mut Cart, customer_name: &str) -> SaleResult<String> {
        if cart.is_empty() {
            return Err(ValidationError::required("cart items").into());
        }
        validate_customer_name(customer_name)?;

        let totals = cart.totals();
        let invoice = Invoice {
            id: Uuid::new_v4().to_string(),
            invoice_date: Utc::now(),
            customer_name: customer_name.trim().to_string(),
            subtotal_cents: totals.subtotal.cents(),
            tax_cents: totals.tax.cents(),
            total_cents: totals.total.cents(),
            invoice_type: InvoiceType::Sale,
            description: None,
        };

        debug!(
            invoice_id = %invoice.id,
            lines = cart.line_count(),
            total = %totals.total,
            "Processing sale"
        );

        let mut tx = self.pool.begin().await.map_err(DbError::transaction)?;

        match write_sale(&mut tx, &invoice, cart).await {
            Ok(()) => {
                tx.commit().await.map_err(DbError::transaction)?;
            }
            Err(err) => {
                warn!(invoice_id = %invoice.id, error = %err, "Sale rolled back");
                if let Err(rollback_err) = tx.rollback().await {
                    error!(error = %rollback_err, "Rollback failed");
                }
                return Err(err.into());
            }
        }

        info!(
            invoice_id = %invoice.id,
            customer = %invoice.customer_name,
            items = cart.line_count(),
            total = %totals.total,
            "Sale committed"
        );

        cart.clear();
        Ok(invoice.id)
    }

    /// Records a SERVICE invoice: a narrative and an amount, no items and no
    /// stock effect. Returns the invoice id.
    pub async fn record_service_invoice(
        &self,
        customer_name: &str,
        amount: Money,
        description: &str,
    ) -> SaleResult<String> {
        validate_customer_name(customer_name)?;
        validate_service_amount(amount.cents())?;
        validate_service_description(description)?;

        let invoice = Invoice {
            id: Uuid::new_v4().to_string(),
            invoice_date: Utc::now(),
            customer_name: customer_name.trim().to_string(),
            subtotal_cents: amount.cents(),
            tax_cents: 0,
            total_cents: amount.cents(),
            invoice_type: InvoiceType::Service,
            description: Some(description.trim().to_string()),
        };

        let mut conn = self.pool.acquire().await.map_err(DbError::from)?;
        let id = InvoiceRepository::create_tx(&mut conn, &invoice).await?;

        info!(invoice_id = %id, total = %amount, "Service invoice recorded");
        Ok(id)
    }
}

/// Writes the header and every line. Runs inside the caller's transaction.
async fn write_sale(conn: &mut SqliteConnection, invoice: &Invoice, cart: &Cart) -> DbResult<()> {
    InvoiceRepository::create_tx(conn, invoice).await?;

    for (index, line) in cart.lines().iter().enumerate() {
        let item = InvoiceItem {
            id: Uuid::new_v4().to_string(),
            invoice_id: invoice.id.clone(),
            product_id: line.product_id.clone(),
            line_no: index as i64 + 1,
            product_name: line.name.clone(),
            quantity: line.quantity,
            unit_price_cents: line.unit_price.cents(),
        };

        // The invoice row exists, so a foreign key failure here means the product is gone
        InvoiceRepository::add_item_tx(conn, &item)
            .await
            .map_err(|e| match e {
                DbError::ForeignKeyViolation { .. } => {
                    DbError::not_found("Product", &line.product_id)
                }
                other => other,
            })?;

        ProductRepository::adjust_stock_tx(conn, &line.product_id, -line.quantity).await?;
    }

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Database, DbConfig};
    use almacen_core::{Product, TaxRate};

    async fn setup() -> (Database, Product, Product) {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let a = db
            .products()
            .insert(&Product::new("A", 1000, 10))
            .await
            .unwrap();
        let b = db
            .products()
            .insert(&Product::new("B", 500, 10))
            .await
            .unwrap();
        (db, a, b)
    }

    #[tokio::test]
    async fn test_successful_sale() {
        let (db, a, b) = setup().await;
        let mut cart = Cart::new(TaxRate::from_bps(1600));
        cart.add_item(&a, 2).unwrap();
        cart.add_item(&b, 1).unwrap();

        let id = db.sales().process_sale(&mut cart, "Ana").await.unwrap();

        assert!(cart.is_empty());
        let detail = db.invoices().get_with_items(&id).await.unwrap().unwrap();
        assert_eq!(detail.invoice.subtotal_cents, 2500);
        assert_eq!(detail.invoice.tax_cents, 400);
        assert_eq!(detail.invoice.total_cents, 2900);
        assert_eq!(detail.items.len(), 2);
        assert!(detail.is_consistent());

        let products = db.products();
        assert_eq!(products.get_by_id(&a.id).await.unwrap().unwrap().stock, 8);
        assert_eq!(products.get_by_id(&b.id).await.unwrap().unwrap().stock, 9);
    }

    #[tokio::test]
    async fn test_empty_cart_rejected() {
        let (db, _, _) = setup().await;
        let mut cart = Cart::new(TaxRate::default());

        let err = db.sales().process_sale(&mut cart, "Ana").await.unwrap_err();
        assert!(matches!(err, SaleError::Core(CoreError::Validation(_))));
        assert_eq!(db.invoices().count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_blank_customer_rejected() {
        let (db, a, _) = setup().await;
        let mut cart = Cart::new(TaxRate::default());
        cart.add_item(&a, 1).unwrap();

        let err = db.sales().process_sale(&mut cart, "   ").await.unwrap_err();
        assert!(matches!(err, SaleError::Core(CoreError::Validation(_))));
        assert_eq!(cart.line_count(), 1);
        assert_eq!(db.invoices().count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_deleted_product_fails_with_not_found() {
        let (db, a, b) = setup().await;
        let mut cart = Cart::new(TaxRate::default());
        cart.add_item(&a, 1).unwrap();
        cart.add_item(&b, 1).unwrap();
        db.products().delete(&b.id).await.unwrap();

        let err = db.sales().process_sale(&mut cart, "Ana").await.unwrap_err();
        assert!(matches!(err, SaleError::Db(DbError::NotFound { .. })));
        assert_eq!(cart.line_count(), 2);
        assert_eq!(
            db.products().get_by_id(&a.id).await.unwrap().unwrap().stock,
            10
        );
        assert_eq!(db.invoices().count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_service_invoice() {
        let (db, a, _) = setup().await;

        let id = db
            .sales()
            .record_service_invoice("Luis", Money::from_cents(15_000), "Cambio de pantalla")
            .await
            .unwrap();

        let detail = db.invoices().get_with_items(&id).await.unwrap().unwrap();
        assert_eq!(detail.invoice.invoice_type, InvoiceType::Service);
        assert_eq!(detail.invoice.total_cents, 15_000);
        assert_eq!(detail.invoice.tax_cents, 0);
        assert_eq!(
            detail.invoice.description.as_deref(),
            Some("Cambio de pantalla")
        );
        assert!(detail.items.is_empty());
        assert!(detail.is_consistent());
        assert_eq!(
            db.products().get_by_id(&a.id).await.unwrap().unwrap().stock,
            10
        );
    }

    #[tokio::test]
    async fn test_service_invoice_requires_description_and_amount() {
        let (db, _, _) = setup().await;
        let sales = db.sales();

        assert!(matches!(
            sales
                .record_service_invoice("Luis", Money::from_cents(100), " ")
                .await,
            Err(SaleError::Core(CoreError::Validation(_)))
        ));
        assert!(matches!(
            sales
                .record_service_invoice("Luis", Money::zero(), "Revisión")
                .await,
            Err(SaleError::Core(CoreError::Validation(_)))
        ));
        assert_eq!(db.invoices().count().await.unwrap(), 0);
    }

    #[test]
    fn test_insufficient_stock_maps_to_core_error() {
        let err: SaleError = DbError::InsufficientStock {
            product: "A".to_string(),
            available: 0,
            requested: 1,
        }
        .into();
        assert!(matches!(err, SaleError::Core(CoreError::InsufficientStock { .. })));

        let err: SaleError = DbError::PoolExhausted.into();
        assert!(matches!(err, SaleError::Db(DbError::PoolExhausted)));
    }
}
