//! Error types for core operations.

use thiserror::Error;

/// Errors raised while validating settings changes.
#[derive(Debug, Error)]
pub enum CoreError {
    /// An emoji field failed validation.
    #[error("invalid {field}: {reason}")]
    InvalidEmoji {
        field: &'static str,
        reason: String,
    },
}

/// Result type for core operations.
pub type Result<T> = std::result::Result<T, CoreError>;
