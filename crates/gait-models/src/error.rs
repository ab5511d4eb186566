//! Error types for model validation.

use thiserror::Error;

/// Result type for model operations.
pub type ModelResult<T> = Result<T, ModelError>;

/// Errors raised by model validation.
///
/// `InvalidInput` is the programmer-error class: malformed row structure
/// propagates to the caller instead of being recovered locally.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ModelError {
    #[error("invalid input: {0}")]
    InvalidInput(String),
}

impl ModelError {
    /// Create an invalid-input error.
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput(message.into())
    }
}
