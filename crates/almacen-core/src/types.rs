//! # Domain Types
//!
//! Core domain types used throughout Almacen POS.
//!
//! ## Type Map
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    Category     │   │     Product     │   │      Brand      │       │
//! │  │  id, name       │◄──│  category_id    │──►│  id, name       │       │
//! │  │  description    │   │  brand_id       │   └─────────────────┘       │
//! │  └─────────────────┘   │  price_cents    │                              │
//! │                        │  stock          │                              │
//! │                        └────────▲────────┘                              │
//! │                                 │ product_id (+ name/price snapshot)    │
//! │  ┌─────────────────┐   ┌────────┴────────┐                              │
//! │  │     Invoice     │◄──│   InvoiceItem   │                              │
//! │  │  SALE | SERVICE │   │  quantity       │                              │
//! │  │  total_cents    │   │  unit_price     │                              │
//! │  └─────────────────┘   └─────────────────┘                              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Snapshot Pattern
//! Invoice items copy the product name and unit price at the moment of sale.
//! Renaming or repricing a product later never rewrites history.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::money::Money;
use crate::{DEFAULT_BRAND_ID, DEFAULT_CATEGORY_ID, LOW_STOCK_THRESHOLD};

// =============================================================================
// Tax Rate
// =============================================================================

/// Tax rate represented in basis points (bps).
///
/// ## Why Basis Points?
/// 1 basis point = 0.01% = 1/10000, so 1600 bps = 16%.
/// Integer bps keep tax math exact; percentages only exist for display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxRate(u32);

impl TaxRate {
    /// Creates a tax rate from basis points.
    #[inline]
    pub const fn from_bps(bps: u32) -> Self {
        TaxRate(bps)
    }

    /// Creates a tax rate from a percentage (for configuration input).
    pub fn from_percentage(pct: f64) -> Self {
        TaxRate((pct * 100.0).round() as u32)
    }

    /// Returns the rate in basis points.
    #[inline]
    pub const fn bps(&self) -> u32 {
        self.0
    }

    /// Returns the rate as a percentage (for display only).
    #[inline]
    pub fn percentage(&self) -> f64 {
        self.0 as f64 / 100.0
    }

    /// Zero tax rate.
    #[inline]
    pub const fn zero() -> Self {
        TaxRate(0)
    }
}

impl Default for TaxRate {
    /// The quick-sale rate (16%).
    fn default() -> Self {
        TaxRate(crate::DEFAULT_TAX_RATE_BPS)
    }
}

// =============================================================================
// Catalog: Category and Brand
// =============================================================================

/// A product category (e.g. "Celulares", "Accesorios").
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Category {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
}

impl Category {
    /// Creates a category with a fresh id.
    pub fn new(name: impl Into<String>, description: Option<String>) -> Self {
        Category {
            id: Uuid::new_v4().to_string(),
            name: name.into(),
            description,
        }
    }
}

/// A product brand (e.g. "Samsung").
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Brand {
    pub id: String,
    pub name: String,
}

impl Brand {
    /// Creates a brand with a fresh id.
    pub fn new(name: impl Into<String>) -> Self {
        Brand {
            id: Uuid::new_v4().to_string(),
            name: name.into(),
        }
    }
}

// =============================================================================
// Product
// =============================================================================

/// A product available for sale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Product {
    /// Unique identifier (UUID v4).
    pub id: String,

    /// Display name; unique across the catalog.
    pub name: String,

    /// Optional free-text description.
    pub description: Option<String>,

    /// Price in cents (smallest currency unit), never negative.
    pub price_cents: i64,

    /// Units on hand, never negative.
    pub stock: i64,

    /// Category this product belongs to.
    pub category_id: String,

    /// Brand of this product.
    pub brand_id: String,

    /// Optional model designation (e.g. "A2848").
    pub model: Option<String>,

    /// When the product was created.
    pub created_at: DateTime<Utc>,

    /// When the product was last updated.
    pub updated_at: DateTime<Utc>,
}

impl Product {
    /// Creates a new product in the `General` category and brand.
    ///
    /// ## Example
    /// ```rust
    /// use almacen_core::Product;
    ///
    /// let funda = Product::new("Funda iPhone 15 Pro", 8000, 100)
    ///     .with_description("Funda protectora");
    /// assert_eq!(funda.price().cents(), 8000);
    /// ```
    pub fn new(name: impl Into<String>, price_cents: i64, stock: i64) -> Self {
        let now = Utc::now();
        Product {
            id: Uuid::new_v4().to_string(),
            name: name.into(),
            description: None,
            price_cents,
            stock,
            category_id: DEFAULT_CATEGORY_ID.to_string(),
            brand_id: DEFAULT_BRAND_ID.to_string(),
            model: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Sets the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Sets the category.
    pub fn with_category(mut self, category_id: impl Into<String>) -> Self {
        self.category_id = category_id.into();
        self
    }

    /// Sets the brand.
    pub fn with_brand(mut self, brand_id: impl Into<String>) -> Self {
        self.brand_id = brand_id.into();
        self
    }

    /// Sets the model designation.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    /// Returns the price as Money.
    #[inline]
    pub fn price(&self) -> Money {
        Money::from_cents(self.price_cents)
    }

    /// Value of the units on hand (price × stock).
    #[inline]
    pub fn stock_value(&self) -> Money {
        self.price().multiply_quantity(self.stock)
    }

    /// Checks if `quantity` units can be sold from current stock.
    #[inline]
    pub fn can_sell(&self, quantity: i64) -> bool {
        quantity > 0 && self.stock >= quantity
    }

    /// Stock badge for listings.
    #[inline]
    pub fn stock_status(&self) -> StockStatus {
        StockStatus::from_stock(self.stock)
    }
}

// =============================================================================
// Stock Status
// =============================================================================

/// Coarse stock level shown next to a product.
///
/// ```text
///   stock ≤ 0          → OutOfStock
///   1 ..= threshold    → LowStock     (threshold = 10)
///   > threshold        → InStock
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StockStatus {
    InStock,
    LowStock,
    OutOfStock,
}

impl StockStatus {
    /// Classifies a stock count.
    pub fn from_stock(stock: i64) -> Self {
        if stock <= 0 {
            StockStatus::OutOfStock
        } else if stock <= LOW_STOCK_THRESHOLD {
            StockStatus::LowStock
        } else {
            StockStatus::InStock
        }
    }

    /// Short label for listings.
    pub fn label(&self) -> &'static str {
        match self {
            StockStatus::InStock => "in stock",
            StockStatus::LowStock => "low stock",
            StockStatus::OutOfStock => "out of stock",
        }
    }
}

// =============================================================================
// Invoice Type
// =============================================================================

/// Kind of invoice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "UPPERCASE"))]
#[serde(rename_all = "UPPERCASE")]
pub enum InvoiceType {
    /// Product sale with line items and stock decrements.
    Sale,
    /// Repair / service work: a narrative and an amount, no items.
    Service,
}

impl Default for InvoiceType {
    fn default() -> Self {
        InvoiceType::Sale
    }
}

impl std::fmt::Display for InvoiceType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InvoiceType::Sale => write!(f, "SALE"),
            InvoiceType::Service => write!(f, "SERVICE"),
        }
    }
}

// =============================================================================
// Invoice
// =============================================================================

/// A persisted sale or service record.
///
/// For `Sale` invoices `total_cents == subtotal_cents + tax_cents` and the
/// subtotal equals the sum of the item line totals. `Service` invoices carry
/// the whole amount in `subtotal_cents` / `total_cents` with zero tax.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Invoice {
    pub id: String,
    pub invoice_date: DateTime<Utc>,
    pub customer_name: String,
    pub subtotal_cents: i64,
    pub tax_cents: i64,
    pub total_cents: i64,
    pub invoice_type: InvoiceType,
    /// Service narrative; `None` for sales.
    pub description: Option<String>,
}

impl Invoice {
    /// Returns the total as Money.
    #[inline]
    pub fn total(&self) -> Money {
        Money::from_cents(self.total_cents)
    }
}

// =============================================================================
// Invoice Item
// =============================================================================

/// A product line in a sale invoice.
/// Uses the snapshot pattern to freeze product data at time of sale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct InvoiceItem {
    pub id: String,
    pub invoice_id: String,
    pub product_id: String,
    /// 1-based position in the sale, preserves cart order.
    pub line_no: i64,
    /// Product name at time of sale (frozen).
    pub product_name: String,
    pub quantity: i64,
    /// Unit price in cents at time of sale (frozen).
    pub unit_price_cents: i64,
}

impl InvoiceItem {
    /// Returns the unit price as Money.
    #[inline]
    pub fn unit_price(&self) -> Money {
        Money::from_cents(self.unit_price_cents)
    }

    /// Unit price × quantity.
    #[inline]
    pub fn line_total(&self) -> Money {
        self.unit_price().multiply_quantity(self.quantity)
    }
}

/// An invoice together with its items, as shown on a receipt.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InvoiceDetail {
    pub invoice: Invoice,
    pub items: Vec<InvoiceItem>,
}

impl InvoiceDetail {
    /// Sum of the item line totals.
    pub fn items_subtotal(&self) -> Money {
        self.items.iter().map(InvoiceItem::line_total).sum()
    }

    /// Checks the stored header against its items.
    ///
    /// Sales must have `subtotal == Σ items` and `total == subtotal + tax`;
    /// service invoices must have no items.
    pub fn is_consistent(&self) -> bool {
        let inv = &self.invoice;
        let header_ok = inv.total_cents == inv.subtotal_cents + inv.tax_cents;
        match inv.invoice_type {
            InvoiceType::Sale => {
                header_ok && self.items_subtotal().cents() == inv.subtotal_cents
            }
            InvoiceType::Service => header_ok && self.items.is_empty(),
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tax_rate_from_percentage() {
        let rate = TaxRate::from_percentage(16.0);
        assert_eq!(rate.bps(), 1600);
        assert!((rate.percentage() - 16.0).abs() < 0.001);
        assert_eq!(TaxRate::default(), rate);
    }

    #[test]
    fn test_stock_status_thresholds() {
        assert_eq!(StockStatus::from_stock(-1), StockStatus::OutOfStock);
        assert_eq!(StockStatus::from_stock(0), StockStatus::OutOfStock);
        assert_eq!(StockStatus::from_stock(1), StockStatus::LowStock);
        assert_eq!(StockStatus::from_stock(10), StockStatus::LowStock);
        assert_eq!(StockStatus::from_stock(11), StockStatus::InStock);
    }

    #[test]
    fn test_product_defaults_and_helpers() {
        let p = Product::new("Honor Magic 6 Pro", 280_000, 25).with_model("BVL-N49");
        assert_eq!(p.category_id, DEFAULT_CATEGORY_ID);
        assert_eq!(p.brand_id, DEFAULT_BRAND_ID);
        assert_eq!(p.model.as_deref(), Some("BVL-N49"));
        assert_eq!(p.stock_value().cents(), 7_000_000);
        assert!(p.can_sell(25));
        assert!(!p.can_sell(26));
        assert!(!p.can_sell(0));
    }

    #[test]
    fn test_invoice_type_serializes_uppercase() {
        assert_eq!(serde_json::to_string(&InvoiceType::Sale).unwrap(), "\"SALE\"");
        assert_eq!(
            serde_json::from_str::<InvoiceType>("\"SERVICE\"").unwrap(),
            InvoiceType::Service
        );
        assert_eq!(InvoiceType::Service.to_string(), "SERVICE");
    }

    fn item(line_no: i64, qty: i64, price: i64) -> InvoiceItem {
        InvoiceItem {
            id: format!("item-{line_no}"),
            invoice_id: "inv".to_string(),
            product_id: format!("p-{line_no}"),
            line_no,
            product_name: format!("Product {line_no}"),
            quantity: qty,
            unit_price_cents: price,
        }
    }

    #[test]
    fn test_invoice_detail_consistency() {
        let invoice = Invoice {
            id: "inv".to_string(),
            invoice_date: Utc::now(),
            customer_name: "Ana".to_string(),
            subtotal_cents: 2500,
            tax_cents: 400,
            total_cents: 2900,
            invoice_type: InvoiceType::Sale,
            description: None,
        };
        let mut detail = InvoiceDetail {
            invoice,
            items: vec![item(1, 2, 1000), item(2, 1, 500)],
        };
        assert_eq!(detail.items_subtotal().cents(), 2500);
        assert!(detail.is_consistent());

        detail.items.pop();
        assert!(!detail.is_consistent());
    }
}
