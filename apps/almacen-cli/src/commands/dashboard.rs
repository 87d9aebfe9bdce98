//! # Dashboard Command

use std::io::Write;

use crate::error::AppResult;
use crate::AppContext;
use almacen_core::LOW_STOCK_THRESHOLD;

pub async fn run(ctx: &AppContext, out: &mut dyn Write) -> AppResult<()> {
    let summary = ctx.db.dashboard().summary().await?;
    let fmt = |m| ctx.config.format_currency(m);

    writeln!(out, "{}", ctx.config.store_name)?;
    writeln!(out, "  Products:         {}", summary.product_count)?;
    writeln!(out, "  Inventory value:  {}", fmt(summary.inventory_value))?;
    writeln!(
        out,
        "  Low stock (<= {}): {}",
        LOW_STOCK_THRESHOLD, summary.low_stock_count
    )?;
    writeln!(out, "  Invoices today:   {}", summary.invoices_today)?;
    writeln!(out, "  Revenue today:    {}", fmt(summary.revenue_today))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::tests::{output, test_context};
    use almacen_core::{Money, Product};

    #[tokio::test]
    async fn test_dashboard_figures() {
        let ctx = test_context().await;
        ctx.db
            .products()
            .insert(&Product::new("Funda", 8000, 100))
            .await
            .unwrap();
        ctx.db
            .sales()
            .record_service_invoice("Luis", Money::from_cents(15_000), "Revisión")
            .await
            .unwrap();

        let mut buf = Vec::new();
        run(&ctx, &mut buf).await.unwrap();
        let text = output(buf);

        assert!(text.contains("Products:         1"));
        assert!(text.contains("Inventory value:  $8000.00"));
        assert!(text.contains("Invoices today:   1"));
        assert!(text.contains("Revenue today:    $150.00"));
    }
}
