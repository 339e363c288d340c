//! Error types for the cache layer.

use thiserror::Error;

/// Result type for cache operations.
pub type CacheResult<T> = Result<T, CacheError>;

/// Errors that can occur in cache operations.
#[derive(Debug, Error)]
pub enum CacheError {
    /// The preparer failed to compile the SQL text.
    ///
    /// Nothing is cached for the key; a later call retries the builder.
    #[error("prepare failed: {0}")]
    Prepare(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// A category index beyond the configured category count was requested.
    #[error("category {category} out of range (configured count {count})")]
    CategoryOutOfRange { category: usize, count: usize },

    /// A resize below the built-in category count was requested.
    #[error("cannot resize to {requested} categories (minimum {minimum})")]
    TooFewCategories { requested: usize, minimum: usize },
}
