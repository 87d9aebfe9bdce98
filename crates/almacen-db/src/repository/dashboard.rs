//! # Dashboard Queries
//!
//! Store-wide figures for the `dashboard` command.
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │  Inventory value     Σ price_cents × stock  │
//! │  Products            COUNT(products)        │
//! │  Low stock           stock ≤ 10             │
//! │  Invoices today      COUNT / Σ total (UTC)  │
//! └─────────────────────────────────────────────┘
//! ```

use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;

use crate::error::DbResult;
use almacen_core::{Money, LOW_STOCK_THRESHOLD};

/// Snapshot of the store figures.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DashboardSummary {
    pub inventory_value: Money,
    pub product_count: i64,
    pub low_stock_count: i64,
    pub invoices_today: i64,
    pub revenue_today: Money,
}

/// Read-only aggregate queries.
#[derive(Debug, Clone)]
pub struct DashboardRepository {
    pool: SqlitePool,
}

impl DashboardRepository {
    pub fn new(pool: SqlitePool) -> Self {
        DashboardRepository { pool }
    }

    /// Figures as of now, with "today" being the current UTC date.
    pub async fn summary(&self) -> DbResult<DashboardSummary> {
        self.summary_for(Utc::now().date_naive()).await
    }

    /// Figures with invoice totals restricted to `day` (UTC).
    pub async fn summary_for(&self, day: NaiveDate) -> DbResult<DashboardSummary> {
        let (inventory_value, product_count, low_stock_count): (i64, i64, i64) = sqlx::query_as(
            r#"
            SELECT
                COALESCE(SUM(price_cents * stock), 0),
                COUNT(*),
                COALESCE(SUM(CASE WHEN stock <= ?1 THEN 1 ELSE 0 END), 0)
            FROM products
            "#,
        )
        .bind(LOW_STOCK_THRESHOLD)
        .fetch_one(&self.pool)
        .await?;

        // invoice_date is RFC 3339 text, so its first 10 chars are the UTC date
        let (invoices_today, revenue_today): (i64, i64) = sqlx::query_as(
            r#"
            SELECT COUNT(*), COALESCE(SUM(total_cents), 0)
            FROM invoices
            WHERE substr(invoice_date, 1, 10) = ?1
            "#,
        )
        .bind(day.format("%Y-%m-%d").to_string())
        .fetch_one(&self.pool)
        .await?;

        Ok(DashboardSummary {
            inventory_value: Money::from_cents(inventory_value),
            product_count,
            low_stock_count,
            invoices_today,
            revenue_today: Money::from_cents(revenue_today),
        })
    }
}
