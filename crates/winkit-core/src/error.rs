//! Common error types for winkit-core.

use thiserror::Error;

/// Core-level errors.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CoreError {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    /// Normal terminal signal of a non-looping dispenser.
    #[error("sequence exhausted")]
    ExhaustedSequence,
}

/// Result type for core operations.
pub type CoreResult<T> = Result<T, CoreError>;
