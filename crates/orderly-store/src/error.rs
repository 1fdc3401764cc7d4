//! # Store Error Types
//!
//! ## Error Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Propagation                                    │
//! │                                                                         │
//! │  SQLite Error (sqlx::Error)                                            │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  StoreError (this module) ← Adds context and categorization            │
//! │       │                                                                 │
//! │       ├──► SessionStore impl (CLI) → ClientError::Session              │
//! │       │                                                                 │
//! │       └──► CliError → one line on stderr                               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    /// A CHECK or UNIQUE constraint rejected a row.
    ///
    /// ## When This Occurs
    /// - Cart quantity outside 1..=99
    /// - Unknown role name in the session row
    #[error("Constraint violated: {0}")]
    Constraint(String),

    /// A stored value could not be turned back into a domain value.
    #[error("Corrupt {table} row: {reason}")]
    Corrupt { table: String, reason: String },

    /// Database file could not be opened or created.
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    #[error("Migration failed: {0}")]
    MigrationFailed(String),

    #[error("Query failed: {0}")]
    QueryFailed(String),

    /// Pool exhausted (all connections in use).
    #[error("Connection pool exhausted")]
    PoolExhausted,

    #[error("Internal database error: {0}")]
    Internal(String),
}

impl StoreError {
    pub fn corrupt(table: impl Into<String>, reason: impl Into<String>) -> Self {
        StoreError::Corrupt {
            table: table.into(),
            reason: reason.into(),
        }
    }
}

/// Convert sqlx errors to StoreError.
///
/// ## Error Mapping
/// ```text
/// sqlx::Error::Database       → Constraint or QueryFailed by message
/// sqlx::Error::PoolTimedOut   → StoreError::PoolExhausted
/// sqlx::Error::PoolClosed     → StoreError::ConnectionFailed
/// Other                       → StoreError::Internal
/// ```
impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::Database(db_err) => {
                let msg = db_err.message();
                if msg.contains("constraint failed") {
                    StoreError::Constraint(msg.to_string())
                } else {
                    StoreError::QueryFailed(msg.to_string())
                }
            }

            sqlx::Error::PoolTimedOut => StoreError::PoolExhausted,

            sqlx::Error::PoolClosed => StoreError::ConnectionFailed("Pool is closed".to_string()),

            _ => StoreError::Internal(err.to_string()),
        }
    }
}

impl From<sqlx::migrate::MigrateError> for StoreError {
    fn from(err: sqlx::migrate::MigrateError) -> Self {
        StoreError::MigrationFailed(err.to_string())
    }
}

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;
