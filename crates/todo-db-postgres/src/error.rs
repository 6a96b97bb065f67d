//! Error types for the PostgreSQL storage backend.

use sqlx_core::error::Error as SqlxError;
use todo_core::StorageError;

/// Errors raised while setting up the PostgreSQL backend.
#[derive(Debug, thiserror::Error)]
pub enum PostgresError {
    /// Database connection error.
    #[error("Database connection error: {0}")]
    Connection(#[from] SqlxError),

    /// Migration error.
    #[error("Migration error: {0}")]
    Migration(String),

    /// Configuration error.
    #[error("Configuration error: {message}")]
    Config { message: String },
}

impl PostgresError {
    /// Creates a new configuration error.
    #[must_use]
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }
}

/// Result type alias for PostgreSQL setup operations.
pub type Result<T> = std::result::Result<T, PostgresError>;

/// Maps a sqlx error onto the shared storage taxonomy.
///
/// Unique-constraint violations become `Conflict` so the boundary can answer
/// 400 instead of a generic 500; pool/IO failures become `ConnectionError`.
pub(crate) fn map_sqlx_error(err: SqlxError) -> StorageError {
    match &err {
        SqlxError::Database(db_err) if db_err.is_unique_violation() => {
            StorageError::conflict(db_err.message().to_string())
        }
        SqlxError::PoolTimedOut | SqlxError::PoolClosed | SqlxError::Io(_) | SqlxError::Tls(_) => {
            StorageError::connection_error(err.to_string())
        }
        _ => StorageError::internal(err.to_string()),
    }
}
