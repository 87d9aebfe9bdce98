//! # Quick-Sale Cart
//!
//! In-memory state of one pending sale: which products, how many of each, and
//! the money they add up to.
//!
//! ## Cart Operations Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Cart Operations                                      │
//! │                                                                         │
//! │  Operation              Guard                       State change        │
//! │  ─────────              ─────                       ────────────        │
//! │                                                                         │
//! │  add_item(p, n) ──────► 1 ≤ n ≤ 9999 ─────────────► push / qty += n     │
//! │                         qty + n ≤ p.stock                               │
//! │                         else OutOfStock                                 │
//! │                                                                         │
//! │  set_quantity(id, n) ─► n ≤ 0 → remove ───────────► lines[i].qty = n    │
//! │                         n > stock → Insufficient                        │
//! │                                                                         │
//! │  (both) ──────────────► total fits in i64 ────────► else TooLarge       │
//! │                                                                         │
//! │  remove_item(id) ─────► (none) ───────────────────► retain(≠ id)        │
//! │                                                                         │
//! │  clear() ─────────────► (none) ───────────────────► lines.clear()       │
//! │                                                                         │
//! │  totals() ────────────► (read only) ──────────────► CartTotals          │
//! │                                                                         │
//! │  A rejected operation leaves the cart exactly as it was.                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Price Freezing
//! Each line captures the product name, unit price and stock when it is added.
//! The totals and the invoice items are computed from those snapshots, so a
//! price change in the catalog never alters a cart that is already open.

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult, ValidationError};
use crate::money::Money;
use crate::types::{Product, TaxRate};
use crate::validation::validate_quantity;

// =============================================================================
// Cart Line
// =============================================================================

/// One product in the cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLine {
    /// Product ID (UUID)
    pub product_id: String,

    /// Product name at time of adding (frozen)
    pub name: String,

    /// Unit price at time of adding (frozen)
    pub unit_price: Money,

    /// Units in the cart, always ≥ 1
    pub quantity: i64,

    /// Stock as known when the line was added or last refreshed
    pub available: i64,
}

impl CartLine {
    fn from_product(product: &Product, quantity: i64) -> Self {
        CartLine {
            product_id: product.id.clone(),
            name: product.name.clone(),
            unit_price: product.price(),
            quantity,
            available: product.stock,
        }
    }

    /// Unit price × quantity.
    #[inline]
    pub fn line_total(&self) -> Money {
        self.unit_price.multiply_quantity(self.quantity)
    }

    fn checked_line_total(&self) -> Option<Money> {
        self.unit_price.checked_multiply_quantity(self.quantity)
    }
}

// =============================================================================
// Cart Totals
// =============================================================================

/// Money summary of a cart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartTotals {
    pub subtotal: Money,
    pub tax: Money,
    pub total: Money,
}

impl From<&Cart> for CartTotals {
    fn from(cart: &Cart) -> Self {
        cart.totals()
    }
}

// =============================================================================
// Cart
// =============================================================================

/// The cart of a pending sale.
///
/// ## Invariants
/// - Lines are unique by `product_id` (adding the same product increases quantity)
/// - Every line has `1 ≤ quantity ≤ available`
/// - Subtotal, tax and total fit in `i64` cents
/// - Lines keep insertion order
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Cart {
    lines: Vec<CartLine>,
    tax_rate: TaxRate,
}

impl Cart {
    /// Creates an empty cart that taxes at `tax_rate`.
    pub fn new(tax_rate: TaxRate) -> Self {
        Cart {
            lines: Vec::new(),
            tax_rate,
        }
    }

    /// Adds `quantity` units of `product`, merging with an existing line.
    ///
    /// ## Errors
    /// - `Validation` if `quantity` is not in `1..=MAX_LINE_QUANTITY`
    /// - `OutOfStock` if the resulting quantity would exceed `product.stock`
    /// - `Validation` if the line or cart total would overflow
    ///
    /// ## Example
    /// ```rust
    /// use almacen_core::{Cart, CoreError, Product, TaxRate};
    ///
    /// let mut cart = Cart::new(TaxRate::from_bps(1600));
    /// let funda = Product::new("Funda", 8000, 1);
    ///
    /// cart.add_item(&funda, 1).unwrap();
    /// let err = cart.add_item(&funda, 1).unwrap_err();
    /// assert!(matches!(err, CoreError::OutOfStock { .. }));
    /// assert_eq!(cart.quantity_of(&funda.id), 1);
    /// ```
    pub fn add_item(&mut self, product: &Product, quantity: i64) -> CoreResult<()> {
        validate_quantity(quantity)?;

        let current = self.quantity_of(&product.id);
        let requested = current.saturating_add(quantity);
        if !product.can_sell(requested) {
            return Err(CoreError::OutOfStock {
                product: product.name.clone(),
                available: product.stock,
                requested,
            });
        }

        let mut lines = self.lines.clone();
        match lines.iter_mut().find(|l| l.product_id == product.id) {
            Some(line) => {
                line.quantity = requested;
                line.available = product.stock;
            }
            None => lines.push(CartLine::from_product(product, quantity)),
        }
        self.replace_lines(lines)
    }

    /// Sets the quantity of a line. A quantity ≤ 0 removes the line.
    ///
    /// ## Errors
    /// - `ProductNotInCart` if there is no line for `product_id`
    /// - `Validation` if `quantity` exceeds `MAX_LINE_QUANTITY`
    /// - `InsufficientStock` if `quantity` exceeds the stock known for the line
    /// - `Validation` if the cart total would overflow
    pub fn set_quantity(&mut self, product_id: &str, quantity: i64) -> CoreResult<()> {
        let Some(index) = self.lines.iter().position(|l| l.product_id == product_id) else {
            return Err(CoreError::ProductNotInCart(product_id.to_string()));
        };

        if quantity <= 0 {
            self.lines.remove(index);
            return Ok(());
        }

        validate_quantity(quantity)?;

        let line = &self.lines[index];
        if quantity > line.available {
            return Err(CoreError::InsufficientStock {
                product: line.name.clone(),
                available: line.available,
                requested: quantity,
            });
        }

        let mut lines = self.lines.clone();
        lines[index].quantity = quantity;
        self.replace_lines(lines)
    }

    /// Installs `lines` only if their totals can be represented.
    fn replace_lines(&mut self, lines: Vec<CartLine>) -> CoreResult<()> {
        if checked_totals(&lines, self.tax_rate).is_none() {
            return Err(ValidationError::TooLarge {
                field: "sale total".to_string(),
            }
            .into());
        }
        self.lines = lines;
        Ok(())
    }

    /// Removes the line for `product_id`. Absent products are ignored.
    pub fn remove_item(&mut self, product_id: &str) {
        self.lines.retain(|l| l.product_id != product_id);
    }

    /// Empties the cart.
    pub fn clear(&mut self) {
        self.lines.clear();
    }

    /// Subtotal, tax and total of the current lines.
    ///
    /// Tax is computed once on the subtotal, not per line. A cart built
    /// through `add_item`/`set_quantity` never overflows; a deserialized one
    /// that would saturates instead of panicking.
    pub fn totals(&self) -> CartTotals {
        checked_totals(&self.lines, self.tax_rate).unwrap_or(CartTotals {
            subtotal: Money::from_cents(i64::MAX),
            tax: Money::zero(),
            total: Money::from_cents(i64::MAX),
        })
    }

    /// Lines in insertion order.
    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Number of distinct products.
    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    /// Units across all lines.
    pub fn total_quantity(&self) -> i64 {
        self.lines.iter().map(|l| l.quantity).sum()
    }

    /// Units of `product_id` in the cart (0 if absent).
    pub fn quantity_of(&self, product_id: &str) -> i64 {
        self.lines
            .iter()
            .find(|l| l.product_id == product_id)
            .map(|l| l.quantity)
            .unwrap_or(0)
    }

    pub fn tax_rate(&self) -> TaxRate {
        self.tax_rate
    }
}

fn checked_totals(lines: &[CartLine], tax_rate: TaxRate) -> Option<CartTotals> {
    let subtotal = lines
        .iter()
        .try_fold(Money::zero(), |acc, line| acc.checked_add(line.checked_line_total()?))?;
    let tax = subtotal.calculate_tax(tax_rate);
    let total = subtotal.checked_add(tax)?;
    Some(CartTotals {
        subtotal,
        tax,
        total,
    })
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::MAX_LINE_QUANTITY;

    fn product(name: &str, price_cents: i64, stock: i64) -> Product {
        Product::new(name, price_cents, stock)
    }

    fn cart() -> Cart {
        Cart::new(TaxRate::from_bps(1600))
    }

    #[test]
    fn test_totals_example() {
        let a = product("A", 1000, 10);
        let b = product("B", 500, 10);
        let mut cart = cart();

        cart.add_item(&a, 2).unwrap();
        cart.add_item(&b, 1).unwrap();

        let totals = cart.totals();
        assert_eq!(totals.subtotal, Money::from_cents(2500));
        assert_eq!(totals.tax, Money::from_cents(400));
        assert_eq!(totals.total, Money::from_cents(2900));
        assert_eq!(CartTotals::from(&cart), totals);
    }

    #[test]
    fn test_add_same_product_merges_line() {
        let a = product("A", 999, 10);
        let mut cart = cart();

        cart.add_item(&a, 2).unwrap();
        cart.add_item(&a, 3).unwrap();

        assert_eq!(cart.line_count(), 1);
        assert_eq!(cart.total_quantity(), 5);
        assert_eq!(cart.totals().subtotal.cents(), 4995);
    }

    #[test]
    fn test_add_never_exceeds_stock() {
        let a = product("A", 100, 3);
        let mut cart = cart();

        for _ in 0..3 {
            cart.add_item(&a, 1).unwrap();
        }
        let err = cart.add_item(&a, 1).unwrap_err();
        assert!(matches!(
            err,
            CoreError::OutOfStock {
                available: 3,
                requested: 4,
                ..
            }
        ));
        assert_eq!(cart.quantity_of(&a.id), 3);

        assert!(cart.add_item(&a, 10).is_err());
        assert_eq!(cart.quantity_of(&a.id), 3);
    }

    #[test]
    fn test_add_out_of_stock_product_rejected() {
        let empty = product("Agotado", 100, 0);
        let mut cart = cart();

        assert!(matches!(
            cart.add_item(&empty, 1),
            Err(CoreError::OutOfStock { .. })
        ));
        assert!(cart.is_empty());
    }

    #[test]
    fn test_add_non_positive_quantity_is_validation_error() {
        let a = product("A", 100, 5);
        let mut cart = cart();

        assert!(matches!(cart.add_item(&a, 0), Err(CoreError::Validation(_))));
        assert!(matches!(cart.add_item(&a, -2), Err(CoreError::Validation(_))));
        assert!(cart.is_empty());
    }

    #[test]
    fn test_set_quantity() {
        let a = product("A", 250, 5);
        let mut cart = cart();
        cart.add_item(&a, 1).unwrap();

        cart.set_quantity(&a.id, 5).unwrap();
        assert_eq!(cart.quantity_of(&a.id), 5);

        let err = cart.set_quantity(&a.id, 6).unwrap_err();
        assert!(matches!(err, CoreError::InsufficientStock { .. }));
        assert_eq!(cart.quantity_of(&a.id), 5);

        cart.set_quantity(&a.id, 0).unwrap();
        assert!(cart.is_empty());

        assert!(matches!(
            cart.set_quantity(&a.id, 1),
            Err(CoreError::ProductNotInCart(_))
        ));
    }

    #[test]
    fn test_remove_and_clear_are_idempotent() {
        let a = product("A", 100, 5);
        let b = product("B", 200, 5);
        let mut cart = cart();
        cart.add_item(&a, 1).unwrap();
        cart.add_item(&b, 1).unwrap();

        cart.remove_item("missing");
        assert_eq!(cart.line_count(), 2);

        cart.remove_item(&a.id);
        cart.remove_item(&a.id);
        assert_eq!(cart.line_count(), 1);

        cart.clear();
        cart.clear();
        assert!(cart.is_empty());
        assert_eq!(cart.totals().total, Money::zero());
    }

    #[test]
    fn test_lines_keep_insertion_order() {
        let a = product("A", 100, 5);
        let b = product("B", 100, 5);
        let c = product("C", 100, 5);
        let mut cart = cart();
        cart.add_item(&c, 1).unwrap();
        cart.add_item(&a, 1).unwrap();
        cart.add_item(&b, 1).unwrap();
        cart.add_item(&c, 1).unwrap();

        let names: Vec<&str> = cart.lines().iter().map(|l| l.name.as_str()).collect();
        assert_eq!(names, ["C", "A", "B"]);
    }

    #[test]
    fn test_subtotal_uses_price_snapshot() {
        let mut a = product("A", 1000, 5);
        let mut cart = cart();
        cart.add_item(&a, 1).unwrap();

        a.price_cents = 5000;
        cart.add_item(&a, 1).unwrap();

        assert_eq!(cart.lines()[0].unit_price.cents(), 1000);
        assert_eq!(cart.totals().subtotal.cents(), 2000);
    }

    #[test]
    fn test_subtotal_matches_lines_after_mixed_operations() {
        let a = product("A", 333, 10);
        let b = product("B", 1250, 4);
        let c = product("C", 7, 100);
        let mut cart = cart();

        cart.add_item(&a, 3).unwrap();
        cart.add_item(&b, 2).unwrap();
        cart.add_item(&c, 50).unwrap();
        cart.set_quantity(&b.id, 4).unwrap();
        let _ = cart.add_item(&b, 1);
        cart.remove_item(&a.id);
        cart.add_item(&a, 1).unwrap();

        let expected: i64 = cart
            .lines()
            .iter()
            .map(|l| l.quantity * l.unit_price.cents())
            .sum();
        assert_eq!(cart.totals().subtotal.cents(), expected);
        assert_eq!(expected, 4 * 1250 + 50 * 7 + 333);
    }

    #[test]
    fn test_quantity_above_line_cap_rejected() {
        let a = product("A", 100, 20_000);
        let mut cart = cart();

        assert!(matches!(
            cart.add_item(&a, MAX_LINE_QUANTITY + 1),
            Err(CoreError::Validation(ValidationError::OutOfRange { .. }))
        ));
        assert!(cart.is_empty());

        cart.add_item(&a, MAX_LINE_QUANTITY).unwrap();
        assert!(cart.set_quantity(&a.id, MAX_LINE_QUANTITY + 1).is_err());
        assert_eq!(cart.quantity_of(&a.id), MAX_LINE_QUANTITY);
    }

    #[test]
    fn test_huge_price_is_rejected_without_panicking() {
        let price = Money::parse("90000000000000000.00").unwrap();
        let caro = product("Caro", price.cents(), 2);
        let mut cart = cart();

        let err = cart.add_item(&caro, 2).unwrap_err();
        assert!(matches!(
            err,
            CoreError::Validation(ValidationError::TooLarge { .. })
        ));
        assert!(cart.is_empty());
        assert_eq!(cart.totals().total, Money::zero());

        // One unit fits in the subtotal but not once tax is added
        assert!(cart.add_item(&caro, 1).is_err());
        assert!(cart.is_empty());
    }

    #[test]
    fn test_set_quantity_overflow_keeps_previous_quantity() {
        let big = product("Big", i64::MAX / 4, 8);
        let mut cart = Cart::new(TaxRate::zero());
        cart.add_item(&big, 2).unwrap();

        let err = cart.set_quantity(&big.id, 5).unwrap_err();
        assert!(matches!(err, CoreError::Validation(_)));
        assert_eq!(cart.quantity_of(&big.id), 2);
        assert_eq!(cart.totals().subtotal.cents(), (i64::MAX / 4) * 2);
    }

    #[test]
    fn test_zero_tax_rate() {
        let a = product("A", 1000, 5);
        let mut cart = Cart::new(TaxRate::zero());
        cart.add_item(&a, 2).unwrap();

        let totals = cart.totals();
        assert!(totals.tax.is_zero());
        assert_eq!(totals.total, totals.subtotal);
    }
}
