//! Error types for the session layer.

use modelsql_core::CacheError;
use thiserror::Error;

/// Result type for session operations.
pub type SessionResult<T> = Result<T, SessionError>;

/// Errors that can occur in session operations.
#[derive(Debug, Error)]
pub enum SessionError {
    /// Database error from SQLite.
    #[error("database error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    /// Statement cache error (compile failure, bad category).
    #[error(transparent)]
    Cache(#[from] CacheError),

    /// A single-row query matched nothing.
    #[error("no row matched the query")]
    NoRow,
}
