//! # Database Error Types
//!
//! Error types for database operations.
//!
//! ## Error Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Propagation                                    │
//! │                                                                         │
//! │  SQLite Error (sqlx::Error)                                            │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  DbError (this module) ← Adds context and categorization               │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  SaleError (sale.rs) ← Quick-sale failures: Core or Db                 │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  AppError (CLI) ← Code + message for the operator                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use almacen_core::ValidationError;
use thiserror::Error;

/// Database operation errors.
///
/// Constraint failures are classified into their own variants. Every other
/// sqlx failure is kept as the `source` of the error.
#[derive(Debug, Error)]
pub enum DbError {
    /// Entity not found in database.
    ///
    /// ## When This Occurs
    /// - `update` / `delete` / `adjust_stock` on an unknown id
    /// - A cart line whose product was deleted before the sale committed
    #[error("{entity} not found: {id}")]
    NotFound { entity: String, id: String },

    /// Unique constraint violation.
    ///
    /// ## When This Occurs
    /// - Inserting a product, category or brand whose name already exists
    #[error("Duplicate {field}: '{value}' already exists")]
    UniqueViolation { field: String, value: String },

    /// Foreign key constraint violation.
    ///
    /// ## When This Occurs
    /// - Product referencing a non-existent category or brand
    /// - Deleting a category, brand or product that is still referenced
    #[error("Foreign key violation: {message}")]
    ForeignKeyViolation { message: String },

    /// CHECK constraint violation (negative stock, non-positive quantity, ...).
    #[error("Check constraint violated: {message}")]
    CheckViolation { message: String },

    /// A stock change would leave the product with negative stock.
    #[error("Insufficient stock for {product}: available {available}, requested {requested}")]
    InsufficientStock {
        product: String,
        available: i64,
        requested: i64,
    },

    /// Input rejected before any SQL ran.
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Database connection failed.
    ///
    /// ## When This Occurs
    /// - Database file can't be created
    /// - File permissions issue
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// Migration failed.
    #[error("Migration failed: {0}")]
    MigrationFailed(String),

    /// Query execution failed.
    #[error("Query failed: {0}")]
    QueryFailed(#[source] sqlx::Error),

    /// Transaction could not begin, commit or roll back.
    #[error("Transaction failed: {0}")]
    TransactionFailed(#[source] sqlx::Error),

    /// Pool exhausted (all connections in use).
    #[error("Connection pool exhausted")]
    PoolExhausted,

    /// Internal database error.
    #[error("Internal database error: {0}")]
    Internal(#[source] sqlx::Error),
}

impl DbError {
    /// Creates a NotFound error for a given entity type and ID.
    pub fn not_found(entity: impl Into<String>, id: impl Into<String>) -> Self {
        DbError::NotFound {
            entity: entity.into(),
            id: id.into(),
        }
    }

    /// Creates a UniqueViolation error.
    pub fn duplicate(field: impl Into<String>, value: impl Into<String>) -> Self {
        DbError::UniqueViolation {
            field: field.into(),
            value: value.into(),
        }
    }

    /// Fills in the offending value of a UniqueViolation raised by SQLite,
    /// which only reports the column.
    pub(crate) fn with_duplicate_value(self, value: &str) -> Self {
        match self {
            DbError::UniqueViolation { field, .. } => DbError::duplicate(field, value),
            other => other,
        }
    }

    /// Wraps a failure of begin / commit / rollback.
    pub(crate) fn transaction(err: sqlx::Error) -> Self {
        DbError::TransactionFailed(err)
    }
}

/// Convert sqlx errors to DbError.
///
/// ## Error Mapping
/// ```text
/// sqlx::Error::RowNotFound    → DbError::NotFound
/// sqlx::Error::Database       → Constraint variant, else QueryFailed(source)
/// sqlx::Error::PoolTimedOut   → DbError::PoolExhausted
/// Other                       → DbError::Internal(source)
/// ```
impl From<sqlx::Error> for DbError {
    fn from(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db_err) = &err {
            let msg = db_err.message();

            // SQLite constraint messages:
            // "UNIQUE constraint failed: <table>.<column>"
            // "FOREIGN KEY constraint failed"
            // "CHECK constraint failed: <expr>"
            if let Some(field) = msg.strip_prefix("UNIQUE constraint failed: ") {
                return DbError::UniqueViolation {
                    field: field.to_string(),
                    value: "unknown".to_string(),
                };
            }
            if msg.contains("FOREIGN KEY constraint failed") {
                return DbError::ForeignKeyViolation {
                    message: msg.to_string(),
                };
            }
            if msg.contains("CHECK constraint failed") {
                return DbError::CheckViolation {
                    message: msg.to_string(),
                };
            }
            return DbError::QueryFailed(err);
        }

        match err {
            sqlx::Error::RowNotFound => DbError::NotFound {
                entity: "Record".to_string(),
                id: "unknown".to_string(),
            },

            sqlx::Error::PoolTimedOut => DbError::PoolExhausted,

            sqlx::Error::PoolClosed => DbError::ConnectionFailed("Pool is closed".to_string()),

            other => DbError::Internal(other),
        }
    }
}

impl From<sqlx::migrate::MigrateError> for DbError {
    fn from(err: sqlx::migrate::MigrateError) -> Self {
        DbError::MigrationFailed(err.to_string())
    }
}

/// Result type for database operations.
pub type DbResult<T> = Result<T, DbError>;
