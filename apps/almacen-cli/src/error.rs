//! # CLI Error Types
//!
//! Unified error type for every command.
//!
//! ## Error Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Error Flow                                       │
//! │                                                                         │
//! │  Command (Rust)                                                         │
//! │  ┌──────────────────────────────────────────────────────────────────┐  │
//! │  │  DbError / CoreError / SaleError / ValidationError               │  │
//! │  │         │                                                        │  │
//! │  │         ▼                                                        │  │
//! │  │  AppError { code, message }                                      │  │
//! │  │         │   storage failures are logged in full,                 │  │
//! │  │         │   the user sees a short message                        │  │
//! │  └─────────┼────────────────────────────────────────────────────────┘  │
//! │            ▼                                                            │
//! │  main: "error: <message>" on stderr, exit code from ErrorCode          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;

use almacen_core::{CoreError, ValidationError};
use almacen_db::{DbError, SaleError};

/// Error returned from commands.
#[derive(Debug, Clone, Error)]
#[error("[{}] {message}", .code.as_str())]
pub struct AppError {
    /// Machine-readable error code
    pub code: ErrorCode,

    /// Human-readable error message for display
    pub message: String,
}

/// Error codes, one per class of failure the user can act on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    /// Resource not found
    NotFound,

    /// Input validation failed
    ValidationError,

    /// Name already taken
    Conflict,

    /// Not enough units to sell
    InsufficientStock,

    /// Database operation failed
    DatabaseError,

    /// Internal error
    Internal,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::NotFound => "NOT_FOUND",
            ErrorCode::ValidationError => "VALIDATION_ERROR",
            ErrorCode::Conflict => "CONFLICT",
            ErrorCode::InsufficientStock => "INSUFFICIENT_STOCK",
            ErrorCode::DatabaseError => "DATABASE_ERROR",
            ErrorCode::Internal => "INTERNAL",
        }
    }

    /// Process exit status for this code.
    pub fn exit_code(&self) -> u8 {
        match self {
            ErrorCode::ValidationError => 2,
            ErrorCode::NotFound => 3,
            ErrorCode::Conflict => 4,
            ErrorCode::InsufficientStock => 5,
            ErrorCode::DatabaseError | ErrorCode::Internal => 1,
        }
    }
}

impl AppError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        AppError {
            code,
            message: message.into(),
        }
    }

    pub fn not_found(resource: &str, id: &str) -> Self {
        AppError::new(ErrorCode::NotFound, format!("{} not found: {}", resource, id))
    }

    pub fn validation(message: impl Into<String>) -> Self {
        AppError::new(ErrorCode::ValidationError, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        AppError::new(ErrorCode::Internal, message)
    }
}

pub type AppResult<T> = Result<T, AppError>;

/// Converts database errors to user-facing errors.
impl From<DbError> for AppError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::NotFound { entity, id } => AppError::not_found(&entity, &id),
            DbError::UniqueViolation { field, value } => AppError::new(
                ErrorCode::Conflict,
                format!("{} '{}' already exists", field, value),
            ),
            DbError::ForeignKeyViolation { message } => {
                tracing::debug!("Foreign key violation: {}", message);
                AppError::validation(
                    "Record is still referenced or refers to a missing record",
                )
            }
            DbError::CheckViolation { message } => {
                tracing::debug!("Check violation: {}", message);
                AppError::validation("Value rejected by the database")
            }
            DbError::InsufficientStock {
                product,
                available,
                requested,
            } => insufficient_stock(&product, available, requested),
            DbError::Validation(e) => AppError::validation(e.to_string()),
            DbError::ConnectionFailed(e) => {
                tracing::error!("Database connection failed: {}", e);
                AppError::new(ErrorCode::DatabaseError, "Database connection failed")
            }
            DbError::MigrationFailed(e) => {
                tracing::error!("Database migration failed: {}", e);
                AppError::new(ErrorCode::DatabaseError, "Database migration failed")
            }
            DbError::QueryFailed(e) => {
                // Log the actual error but return a generic message
                tracing::error!("Database query failed: {}", e);
                AppError::new(ErrorCode::DatabaseError, "Database operation failed")
            }
            DbError::TransactionFailed(e) => {
                tracing::error!("Transaction failed: {}", e);
                AppError::new(ErrorCode::DatabaseError, "Database transaction failed")
            }
            DbError::PoolExhausted => {
                AppError::new(ErrorCode::DatabaseError, "Database pool exhausted")
            }
            DbError::Internal(e) => {
                tracing::error!("Internal database error: {}", e);
                AppError::new(ErrorCode::DatabaseError, "Database operation failed")
            }
        }
    }
}

/// Converts core errors to user-facing errors.
impl From<CoreError> for AppError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::OutOfStock {
                product,
                available,
                requested,
            }
            | CoreError::InsufficientStock {
                product,
                available,
                requested,
            } => insufficient_stock(&product, available, requested),
            CoreError::ProductNotInCart(id) => AppError::not_found("Cart line", &id),
            CoreError::Validation(e) => AppError::validation(e.to_string()),
        }
    }
}

/// A storage failure during a sale always rolls back, so the message says so.
impl From<SaleError> for AppError {
    fn from(err: SaleError) -> Self {
        match err {
            SaleError::Core(e) => e.into(),
            SaleError::Db(e) => {
                let mut app: AppError = e.into();
                app.message = format!("{} (sale not recorded; stock unchanged)", app.message);
                app
            }
        }
    }
}

impl From<ValidationError> for AppError {
    fn from(err: ValidationError) -> Self {
        AppError::validation(err.to_string())
    }
}

/// Output failures (closed pipe, full disk).
impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::internal(format!("Failed to write output: {}", err))
    }
}

fn insufficient_stock(product: &str, available: i64, requested: i64) -> AppError {
    AppError::new(
        ErrorCode::InsufficientStock,
        format!(
            "Insufficient stock for {}: {} available, {} requested",
            product, available, requested
        ),
    )
}
