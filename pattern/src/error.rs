//! Pattern error types.

use semnet_core::ErrorKind;
use thiserror::Error;

/// Errors that can occur when building a matcher.
#[derive(Debug, Error)]
pub enum PatternError {
    /// A parameter is the invalid address.
    #[error("Parameter {position} is the invalid address")]
    InvalidAddress { position: usize },

    /// A parameter type has inconsistent bits.
    #[error("Parameter {position} has an invalid type: {reason}")]
    InvalidType { position: usize, reason: String },
}

impl PatternError {
    pub fn invalid_address(position: usize) -> Self {
        Self::InvalidAddress { position }
    }

    pub fn invalid_type(position: usize, reason: impl Into<String>) -> Self {
        Self::InvalidType {
            position,
            reason: reason.into(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        ErrorKind::InvalidArgument
    }
}

/// Result type for pattern operations.
pub type PatternResult<T> = Result<T, PatternError>;
