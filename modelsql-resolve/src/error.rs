//! Error types for placeholder resolution.

use thiserror::Error;

/// Result type for resolution operations.
pub type ResolveResult<T> = Result<T, ResolveError>;

/// Errors that abort a template resolution. No partial output survives
/// either case.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ResolveError {
    /// A placeholder referenced a model absent from the registry.
    #[error("model {model} is not registered")]
    UnknownModel { model: String },

    /// A placeholder referenced a field absent on a known model.
    #[error("field {field} of model {model} not found")]
    UnknownField { model: String, field: String },
}
