//! # Storage Error Types
//!
//! Error types for PostgreSQL and Redis operations.
//!
//! ## Error Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Propagation                                    │
//! │                                                                         │
//! │  sqlx::Error               redis::RedisError / serde_json::Error       │
//! │       │                              │                                  │
//! │       ▼                              ▼                                  │
//! │  DbError (this module)     CacheError (this module)                    │
//! │       │                              │                                  │
//! │       └──────────────┬───────────────┘                                  │
//! │                      ▼                                                  │
//! │  StoreError (snack-workflow port boundary)                             │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  WorkflowError → ApiError → JSON { code, message }                     │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use snack_workflow::StoreError;
use thiserror::Error;

// =============================================================================
// Database Error
// =============================================================================

/// Database operation errors.
#[derive(Debug, Error)]
pub enum DbError {
    /// Row targeted by an update does not exist.
    #[error("{entity} not found: {id}")]
    NotFound { entity: String, id: String },

    /// Unique constraint violation.
    ///
    /// ## When This Occurs
    /// - Inserting a customer whose name already exists
    #[error("duplicate value violates {constraint}")]
    UniqueViolation { constraint: String },

    /// Foreign key constraint violation.
    ///
    /// ## When This Occurs
    /// - Ledger row referencing a missing product or customer
    #[error("foreign key violation: {message}")]
    ForeignKeyViolation { message: String },

    /// CHECK constraint or guarded update refused the write.
    ///
    /// ## When This Occurs
    /// - Stock delta would drive quantity below zero
    /// - Points debit would drive the balance below zero
    #[error("constraint violation: {message}")]
    ConstraintViolation { message: String },

    /// Database connection failed.
    #[error("connection failed: {0}")]
    ConnectionFailed(String),

    /// Migration failed.
    #[error("migration failed: {0}")]
    MigrationFailed(String),

    /// Query execution failed.
    #[error("query failed: {0}")]
    QueryFailed(String),

    /// Pool exhausted (all connections in use).
    #[error("connection pool exhausted")]
    PoolExhausted,

    /// Internal database error.
    #[error("internal database error: {0}")]
    Internal(String),
}

impl DbError {
    /// Creates a NotFound error for a given entity type and ID.
    pub fn not_found(entity: impl Into<String>, id: impl ToString) -> Self {
        DbError::NotFound {
            entity: entity.into(),
            id: id.to_string(),
        }
    }

    /// Creates a ConstraintViolation error.
    pub fn constraint(message: impl Into<String>) -> Self {
        DbError::ConstraintViolation {
            message: message.into(),
        }
    }
}

/// Convert sqlx errors to DbError.
///
/// ## Error Mapping
/// ```text
/// sqlx::Error::RowNotFound        → DbError::NotFound
/// sqlx::Error::Database           → by SQLSTATE class (23505, 23503, 23514)
/// sqlx::Error::PoolTimedOut       → DbError::PoolExhausted
/// sqlx::Error::Io / Tls / Closed  → DbError::ConnectionFailed
/// Other                           → DbError::Internal
/// ```
impl From<sqlx::Error> for DbError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => DbError::not_found("record", "unknown"),

            sqlx::Error::Database(db_err) => {
                if db_err.is_unique_violation() {
                    DbError::UniqueViolation {
                        constraint: db_err.constraint().unwrap_or("unique index").to_string(),
                    }
                } else if db_err.is_foreign_key_violation() {
                    DbError::ForeignKeyViolation {
                        message: db_err.message().to_string(),
                    }
                } else if db_err.is_check_violation() {
                    DbError::constraint(db_err.message())
                } else {
                    DbError::QueryFailed(db_err.message().to_string())
                }
            }

            sqlx::Error::PoolTimedOut => DbError::PoolExhausted,

            sqlx::Error::PoolClosed => DbError::ConnectionFailed("pool is closed".to_string()),

            sqlx::Error::Io(e) => DbError::ConnectionFailed(e.to_string()),

            sqlx::Error::Tls(e) => DbError::ConnectionFailed(e.to_string()),

            _ => DbError::Internal(err.to_string()),
        }
    }
}

impl From<sqlx::migrate::MigrateError> for DbError {
    fn from(err: sqlx::migrate::MigrateError) -> Self {
        DbError::MigrationFailed(err.to_string())
    }
}

/// Classifies a database error for the workflow.
impl From<DbError> for StoreError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::NotFound { entity, id } => StoreError::NotFound { entity, id },
            DbError::UniqueViolation { .. }
            | DbError::ForeignKeyViolation { .. }
            | DbError::ConstraintViolation { .. } => StoreError::Constraint(err.to_string()),
            DbError::ConnectionFailed(_) | DbError::PoolExhausted => {
                StoreError::Unavailable(err.to_string())
            }
            DbError::MigrationFailed(_) | DbError::QueryFailed(_) | DbError::Internal(_) => {
                StoreError::Backend(err.to_string())
            }
        }
    }
}

/// Result type for database operations.
pub type DbResult<T> = Result<T, DbError>;

// =============================================================================
// Cache Error
// =============================================================================

/// Redis cache errors.
#[derive(Debug, Error)]
pub enum CacheError {
    /// Redis could not be reached.
    #[error("redis connection failed: {0}")]
    Connection(String),

    /// Redis rejected or failed a command.
    #[error("redis command failed: {0}")]
    Command(String),

    /// Cached payload could not be encoded or decoded.
    #[error("report payload invalid: {0}")]
    Payload(#[from] serde_json::Error),
}

impl From<redis::RedisError> for CacheError {
    fn from(err: redis::RedisError) -> Self {
        if err.is_io_error() || err.is_connection_refusal() || err.is_timeout() {
            CacheError::Connection(err.to_string())
        } else {
            CacheError::Command(err.to_string())
        }
    }
}

impl From<CacheError> for StoreError {
    fn from(err: CacheError) -> Self {
        match err {
            CacheError::Connection(_) => StoreError::Unavailable(err.to_string()),
            CacheError::Command(_) | CacheError::Payload(_) => StoreError::Backend(err.to_string()),
        }
    }
}

/// Result type for cache operations.
pub type CacheResult<T> = Result<T, CacheError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_db_error_classification() {
        let err: StoreError = DbError::not_found("product", 7).into();
        assert_eq!(err, StoreError::not_found("product", 7));

        let err: StoreError = DbError::constraint("stock below zero").into();
        assert_eq!(
            err,
            StoreError::Constraint("constraint violation: stock below zero".to_string())
        );

        let err: StoreError = DbError::PoolExhausted.into();
        assert!(matches!(err, StoreError::Unavailable(_)));

        let err: StoreError = DbError::QueryFailed("syntax error".to_string()).into();
        assert!(matches!(err, StoreError::Backend(_)));
    }

    #[test]
    fn test_sqlx_error_mapping() {
        assert!(matches!(
            DbError::from(sqlx::Error::PoolTimedOut),
            DbError::PoolExhausted
        ));
        assert!(matches!(
            DbError::from(sqlx::Error::PoolClosed),
            DbError::ConnectionFailed(_)
        ));
        assert!(matches!(
            DbError::from(sqlx::Error::RowNotFound),
            DbError::NotFound { .. }
        ));
    }

    #[test]
    fn test_cache_error_classification() {
        let payload = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err: StoreError = CacheError::from(payload).into();
        assert!(matches!(err, StoreError::Backend(_)));

        let err: StoreError = CacheError::Connection("refused".to_string()).into();
        assert!(matches!(err, StoreError::Unavailable(_)));
    }
}
