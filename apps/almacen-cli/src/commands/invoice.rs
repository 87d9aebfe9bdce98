//! # Invoice Commands
//!
//! Listing and receipt printing.
//!
//! ## Receipt Layout
//! ```text
//! Almacen
//! Invoice 6f1c...
//! Date: 2026-10-17 14:03
//! Customer: Ana
//! Type: SALE
//! ----------------------------------------
//!   2 x Funda                      $160.00
//!       @ $80.00
//! ----------------------------------------
//! Subtotal                         $160.00
//! Tax                               $25.60
//! Total                            $185.60
//! ```

use std::io::Write;

use clap::Subcommand;

use crate::error::{AppError, AppResult};
use crate::AppContext;
use almacen_core::{InvoiceDetail, InvoiceType, Money};

const RECEIPT_WIDTH: usize = 40;

#[derive(Debug, Subcommand)]
pub enum InvoiceCommand {
    /// List invoices, newest first
    List {
        #[arg(short, long, default_value_t = 20)]
        limit: u32,
    },

    /// Print one invoice with its items
    Show { id: String },
}

pub async fn run(cmd: InvoiceCommand, ctx: &AppContext, out: &mut dyn Write) -> AppResult<()> {
    match cmd {
        InvoiceCommand::List { limit } => {
            let invoices = ctx.db.invoices().list(limit).await?;
            if invoices.is_empty() {
                writeln!(out, "No invoices yet.")?;
                return Ok(());
            }
            for inv in invoices {
                writeln!(
                    out,
                    "{:<36}  {}  {:<7}  {:<24}  {:>12}",
                    inv.id,
                    inv.invoice_date.format("%Y-%m-%d %H:%M"),
                    inv.invoice_type.to_string(),
                    inv.customer_name,
                    ctx.config.format_currency(inv.total())
                )?;
            }
            Ok(())
        }
        InvoiceCommand::Show { id } => {
            let detail = ctx
                .db
                .invoices()
                .get_with_items(&id)
                .await?
                .ok_or_else(|| AppError::not_found("Invoice", &id))?;
            write_receipt(ctx, out, &detail)
        }
    }
}

/// Prints an invoice as a plain-text receipt.
pub(crate) fn write_receipt(
    ctx: &AppContext,
    out: &mut dyn Write,
    detail: &InvoiceDetail,
) -> AppResult<()> {
    let inv = &detail.invoice;
    let rule = "-".repeat(RECEIPT_WIDTH);

    writeln!(out, "{}", ctx.config.store_name)?;
    writeln!(out, "Invoice {}", inv.id)?;
    writeln!(out, "Date: {}", inv.invoice_date.format("%Y-%m-%d %H:%M"))?;
    writeln!(out, "Customer: {}", inv.customer_name)?;
    writeln!(out, "Type: {}", inv.invoice_type)?;
    writeln!(out, "{}", rule)?;

    match inv.invoice_type {
        InvoiceType::Sale => {
            for item in &detail.items {
                let label = format!("{:>3} x {}", item.quantity, item.product_name);
                write_amount_line(ctx, out, &label, item.line_total())?;
                writeln!(out, "      @ {}", ctx.config.format_currency(item.unit_price()))?;
            }
        }
        InvoiceType::Service => {
            if let Some(description) = &inv.description {
                writeln!(out, "{}", description)?;
            }
        }
    }

    writeln!(out, "{}", rule)?;
    write_amount_line(ctx, out, "Subtotal", Money::from_cents(inv.subtotal_cents))?;
    write_amount_line(ctx, out, "Tax", Money::from_cents(inv.tax_cents))?;
    write_amount_line(ctx, out, "Total", inv.total())?;
    Ok(())
}

fn write_amount_line(
    ctx: &AppContext,
    out: &mut dyn Write,
    label: &str,
    amount: Money,
) -> AppResult<()> {
    let amount = ctx.config.format_currency(amount);
    let pad = RECEIPT_WIDTH.saturating_sub(amount.chars().count() + 1);
    writeln!(out, "{:<pad$} {}", label, amount, pad = pad)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::tests::{output, test_context};
    use crate::error::ErrorCode;

    #[tokio::test]
    async fn test_show_service_invoice() {
        let ctx = test_context().await;
        let id = ctx
            .db
            .sales()
            .record_service_invoice("Luis", Money::from_cents(15_000), "Cambio de pantalla")
            .await
            .unwrap();

        let mut buf = Vec::new();
        run(InvoiceCommand::Show { id: id.clone() }, &ctx, &mut buf)
            .await
            .unwrap();
        let text = output(buf);
        assert!(text.contains(&id));
        assert!(text.contains("Customer: Luis"));
        assert!(text.contains("Type: SERVICE"));
        assert!(text.contains("Cambio de pantalla"));
        assert!(text.contains("$150.00"));
        assert!(text.contains("$0.00"));
    }

    #[tokio::test]
    async fn test_list_newest_first() {
        let ctx = test_context().await;
        let sales = ctx.db.sales();
        sales
            .record_service_invoice("Primero", Money::from_cents(100), "Revisión")
            .await
            .unwrap();
        sales
            .record_service_invoice("Segundo", Money::from_cents(200), "Revisión")
            .await
            .unwrap();

        let mut buf = Vec::new();
        run(InvoiceCommand::List { limit: 20 }, &ctx, &mut buf)
            .await
            .unwrap();
        let text = output(buf);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].contains("Segundo"));
        assert!(lines[1].contains("Primero"));
    }

    #[tokio::test]
    async fn test_show_unknown_invoice() {
        let ctx = test_context().await;
        let err = run(
            InvoiceCommand::Show {
                id: "no-existe".to_string(),
            },
            &ctx,
            &mut Vec::new(),
        )
        .await
        .unwrap_err();
        assert_eq!(err.code, ErrorCode::NotFound);
    }
}
