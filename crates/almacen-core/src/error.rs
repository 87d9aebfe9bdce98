//! # Error Types
//!
//! Domain-specific error types for almacen-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  almacen-core errors (this file)                                       │
//! │  ├── CoreError        - Business rule rejections (stock, cart)         │
//! │  └── ValidationError  - Input validation failures                      │
//! │                                                                         │
//! │  almacen-db errors (separate crate)                                    │
//! │  ├── DbError          - Database operation failures                    │
//! │  └── SaleError        - Quick-sale failures (Core or Db)               │
//! │                                                                         │
//! │  CLI errors (in app)                                                   │
//! │  └── AppError         - What the operator sees                         │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → SaleError → AppError → terminal   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Core business logic errors.
///
/// None of these leave any state behind: a rejected cart operation keeps the
/// cart exactly as it was.
#[derive(Debug, Error)]
pub enum CoreError {
    /// The product cannot be added because no more units are available.
    ///
    /// ## When This Occurs
    /// - Product has zero stock and is not in the cart yet
    /// - Adding more units would exceed the stock already reserved in the cart
    #[error("{product} is out of stock: available {available}, requested {requested}")]
    OutOfStock {
        product: String,
        available: i64,
        requested: i64,
    },

    /// A quantity was set explicitly above the available stock.
    ///
    /// ## User Workflow
    /// ```text
    /// Set quantity (qty: 5)
    ///      │
    ///      ▼
    /// Check stock: available=3
    ///      │
    ///      ▼
    /// InsufficientStock { product: "Funda", available: 3, requested: 5 }
    ///      │
    ///      ▼
    /// Operator sees: "Insufficient stock for Funda: available 3, requested 5"
    /// ```
    #[error("Insufficient stock for {product}: available {available}, requested {requested}")]
    InsufficientStock {
        product: String,
        available: i64,
        requested: i64,
    },

    /// The product has no line in the cart.
    #[error("Product {0} is not in the cart")]
    ProductNotInCart(String),

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// These errors occur when user input doesn't meet requirements.
/// Used for early validation before any side effect happens.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Value must not be negative.
    #[error("{field} must not be negative")]
    MustNotBeNegative { field: String },

    /// Value does not fit in the amounts the store can record.
    #[error("{field} is too large")]
    TooLarge { field: String },

    /// Invalid format (e.g., unparseable amount).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },
}

impl ValidationError {
    /// Shorthand for [`ValidationError::Required`].
    pub fn required(field: impl Into<String>) -> Self {
        ValidationError::Required {
            field: field.into(),
        }
    }
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = CoreError::InsufficientStock {
            product: "Funda iPhone 15 Pro".to_string(),
            available: 3,
            requested: 5,
        };
        assert_eq!(
            err.to_string(),
            "Insufficient stock for Funda iPhone 15 Pro: available 3, requested 5"
        );

        let err = CoreError::OutOfStock {
            product: "Xiaomi 14 Ultra".to_string(),
            available: 0,
            requested: 1,
        };
        assert_eq!(
            err.to_string(),
            "Xiaomi 14 Ultra is out of stock: available 0, requested 1"
        );
    }

    #[test]
    fn test_validation_error_messages() {
        assert_eq!(
            ValidationError::required("customer name").to_string(),
            "customer name is required"
        );

        let err = ValidationError::TooLong {
            field: "name".to_string(),
            max: 200,
        };
        assert_eq!(err.to_string(), "name must be at most 200 characters");
    }

    #[test]
    fn test_validation_converts_to_core_error() {
        let core_err: CoreError = ValidationError::required("name").into();
        assert!(matches!(core_err, CoreError::Validation(_)));
    }
}
