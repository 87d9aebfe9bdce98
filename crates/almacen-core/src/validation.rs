//! # Validation Module
//!
//! Input validation rules shared by the database layer and the CLI.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: CLI argument parsing (clap)                                  │
//! │  └── Types and required flags                                          │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: THIS MODULE                                                  │
//! │  ├── Names, quantities, prices                                         │
//! │  └── Runs before any database call                                     │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Database (SQLite)                                            │
//! │  ├── NOT NULL / UNIQUE                                                 │
//! │  ├── CHECK (stock >= 0), CHECK (quantity > 0)                          │
//! │  └── Foreign keys                                                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use crate::error::ValidationError;
use crate::types::{Brand, Category, Product};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Longest accepted name (products, categories, brands, customers).
pub const MAX_NAME_LEN: usize = 200;

/// Longest accepted free-text field (descriptions, service narrative).
pub const MAX_DESCRIPTION_LEN: usize = 2000;

/// Largest quantity accepted for a single cart line.
pub const MAX_LINE_QUANTITY: i64 = 9_999;

/// Largest unit price or service amount, in cents ($100,000,000.00).
pub const MAX_PRICE_CENTS: i64 = 10_000_000_000;

// =============================================================================
// String Validators
// =============================================================================

fn validate_name(field: &str, value: &str) -> ValidationResult<()> {
    let value = value.trim();

    if value.is_empty() {
        return Err(ValidationError::required(field));
    }

    if value.chars().count() > MAX_NAME_LEN {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max: MAX_NAME_LEN,
        });
    }

    Ok(())
}

/// Validates a product name.
///
/// ## Example
/// ```rust
/// use almacen_core::validation::validate_product_name;
///
/// assert!(validate_product_name("Samsung Galaxy S24").is_ok());
/// assert!(validate_product_name("   ").is_err());
/// ```
pub fn validate_product_name(name: &str) -> ValidationResult<()> {
    validate_name("name", name)
}

/// Validates a category name.
pub fn validate_category_name(name: &str) -> ValidationResult<()> {
    validate_name("category name", name)
}

/// Validates a brand name.
pub fn validate_brand_name(name: &str) -> ValidationResult<()> {
    validate_name("brand name", name)
}

/// Validates the customer name of an invoice.
///
/// A blank customer name rejects the sale before anything is written.
pub fn validate_customer_name(name: &str) -> ValidationResult<()> {
    validate_name("customer name", name)
}

/// Validates an optional free-text field (length only).
pub fn validate_description(description: Option<&str>) -> ValidationResult<()> {
    match description {
        Some(text) if text.chars().count() > MAX_DESCRIPTION_LEN => {
            Err(ValidationError::TooLong {
                field: "description".to_string(),
                max: MAX_DESCRIPTION_LEN,
            })
        }
        _ => Ok(()),
    }
}

/// Validates the narrative of a service invoice. Required, unlike product descriptions.
pub fn validate_service_description(description: &str) -> ValidationResult<()> {
    if description.trim().is_empty() {
        return Err(ValidationError::required("description"));
    }
    validate_description(Some(description))
}

/// Validates a search term.
///
/// ## Rules
/// - Can be empty (matches everything)
/// - Maximum 100 characters
///
/// ## Returns
/// The trimmed term.
pub fn validate_search_query(query: &str) -> ValidationResult<String> {
    let query = query.trim();

    if query.chars().count() > 100 {
        return Err(ValidationError::TooLong {
            field: "query".to_string(),
            max: 100,
        });
    }

    Ok(query.to_string())
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a cart quantity.
///
/// ## User Workflow
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │  almacen sale --item <id>:0                                            │
/// │       │                                                                 │
/// │       ▼                                                                 │
/// │  Cart::add_item → validate_quantity(0)                                 │
/// │       │                                                                 │
/// │       ├── qty <= 0?    → "quantity must be positive"                   │
/// │       ├── qty > 9999?  → "quantity must be between 1 and 9999"         │
/// │       └── OK → stock check                                            │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
pub fn validate_quantity(qty: i64) -> ValidationResult<()> {
    if qty <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "quantity".to_string(),
        });
    }

    if qty > MAX_LINE_QUANTITY {
        return Err(ValidationError::OutOfRange {
            field: "quantity".to_string(),
            min: 1,
            max: MAX_LINE_QUANTITY,
        });
    }

    Ok(())
}

/// Validates a price in cents. Zero is allowed, up to [`MAX_PRICE_CENTS`].
///
/// ```rust
/// use almacen_core::validation::validate_price_cents;
///
/// assert!(validate_price_cents(450_000).is_ok());
/// assert!(validate_price_cents(0).is_ok());
/// assert!(validate_price_cents(-100).is_err());
/// assert!(validate_price_cents(9_000_000_000_000_000_000).is_err());
/// ```
pub fn validate_price_cents(cents: i64) -> ValidationResult<()> {
    if cents < 0 {
        return Err(ValidationError::MustNotBeNegative {
            field: "price".to_string(),
        });
    }

    if cents > MAX_PRICE_CENTS {
        return Err(ValidationError::OutOfRange {
            field: "price".to_string(),
            min: 0,
            max: MAX_PRICE_CENTS,
        });
    }

    Ok(())
}

/// Validates a stock level.
pub fn validate_stock(stock: i64) -> ValidationResult<()> {
    if stock < 0 {
        return Err(ValidationError::MustNotBeNegative {
            field: "stock".to_string(),
        });
    }

    Ok(())
}

/// Validates the amount of a service invoice.
pub fn validate_service_amount(cents: i64) -> ValidationResult<()> {
    if cents <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "amount".to_string(),
        });
    }

    if cents > MAX_PRICE_CENTS {
        return Err(ValidationError::OutOfRange {
            field: "amount".to_string(),
            min: 1,
            max: MAX_PRICE_CENTS,
        });
    }

    Ok(())
}

/// Validates a tax rate in basis points (0% to 100%).
pub fn validate_tax_rate_bps(bps: u32) -> ValidationResult<()> {
    if bps > 10_000 {
        return Err(ValidationError::OutOfRange {
            field: "tax_rate".to_string(),
            min: 0,
            max: 10_000,
        });
    }

    Ok(())
}

// =============================================================================
// Entity Validators
// =============================================================================

/// Validates every field of a product before insert or update.
pub fn validate_product(product: &Product) -> ValidationResult<()> {
    validate_product_name(&product.name)?;
    validate_description(product.description.as_deref())?;
    validate_price_cents(product.price_cents)?;
    validate_stock(product.stock)?;
    if let Some(model) = &product.model {
        if model.chars().count() > MAX_NAME_LEN {
            return Err(ValidationError::TooLong {
                field: "model".to_string(),
                max: MAX_NAME_LEN,
            });
        }
    }
    Ok(())
}

/// Validates a category before insert or update.
pub fn validate_category(category: &Category) -> ValidationResult<()> {
    validate_category_name(&category.name)?;
    validate_description(category.description.as_deref())
}

/// Validates a brand before insert or update.
pub fn validate_brand(brand: &Brand) -> ValidationResult<()> {
    validate_brand_name(&brand.name)
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_names() {
        assert!(validate_product_name("iPhone 15 Pro").is_ok());
        assert!(validate_product_name("").is_err());
        assert!(validate_product_name(&"A".repeat(201)).is_err());
        assert!(validate_product_name(&"ñ".repeat(200)).is_ok());

        let err = validate_customer_name("  ").unwrap_err();
        assert_eq!(err.to_string(), "customer name is required");
    }

    #[test]
    fn test_validate_quantity() {
        assert!(validate_quantity(1).is_ok());
        assert!(validate_quantity(MAX_LINE_QUANTITY).is_ok());

        assert!(validate_quantity(0).is_err());
        assert!(validate_quantity(-1).is_err());
        assert!(validate_quantity(MAX_LINE_QUANTITY + 1).is_err());
    }

    #[test]
    fn test_validate_money_fields() {
        assert!(validate_price_cents(0).is_ok());
        assert!(validate_price_cents(-1).is_err());
        assert!(validate_stock(0).is_ok());
        assert!(validate_stock(-3).is_err());
        assert!(validate_service_amount(0).is_err());
        assert!(validate_service_amount(15_000).is_ok());
    }

    #[test]
    fn test_price_and_amount_are_capped() {
        assert!(validate_price_cents(MAX_PRICE_CENTS).is_ok());
        let err = validate_price_cents(9_000_000_000_000_000_000).unwrap_err();
        assert!(matches!(err, ValidationError::OutOfRange { max: MAX_PRICE_CENTS, .. }));

        assert!(validate_service_amount(MAX_PRICE_CENTS).is_ok());
        assert!(validate_service_amount(MAX_PRICE_CENTS + 1).is_err());

        let mut product = Product::new("Caro", MAX_PRICE_CENTS + 1, 2);
        assert!(validate_product(&product).is_err());
        product.price_cents = MAX_PRICE_CENTS;
        assert!(validate_product(&product).is_ok());
    }

    #[test]
    fn test_validate_service_description() {
        assert!(validate_service_description("Cambio de pantalla").is_ok());
        assert!(validate_service_description("   ").is_err());
        assert!(validate_service_description(&"x".repeat(MAX_DESCRIPTION_LEN + 1)).is_err());
    }

    #[test]
    fn test_validate_search_query_trims() {
        assert_eq!(validate_search_query("  funda ").unwrap(), "funda");
        assert_eq!(validate_search_query("").unwrap(), "");
        assert!(validate_search_query(&"q".repeat(101)).is_err());
    }

    #[test]
    fn test_validate_tax_rate_bps() {
        assert!(validate_tax_rate_bps(0).is_ok());
        assert!(validate_tax_rate_bps(1600).is_ok());
        assert!(validate_tax_rate_bps(10_001).is_err());
    }

    #[test]
    fn test_validate_product() {
        let product = Product::new("Funda iPhone 15 Pro", 8000, 100);
        assert!(validate_product(&product).is_ok());

        let mut bad = product.clone();
        bad.stock = -1;
        assert!(validate_product(&bad).is_err());

        let mut bad = product;
        bad.model = Some("m".repeat(MAX_NAME_LEN + 1));
        assert!(validate_product(&bad).is_err());
    }
}
