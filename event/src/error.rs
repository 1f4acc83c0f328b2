//! Event error types.

use semnet_core::{Addr, ErrorKind};
use thiserror::Error;

/// Errors that can occur when subscribing or dispatching.
#[derive(Debug, Error)]
pub enum EventError {
    /// Subscriptions need a real element.
    #[error("Cannot subscribe to {0}")]
    InvalidSubject(Addr),

    /// The dispatcher thread could not be started.
    #[error("Failed to start event dispatcher: {0}")]
    Spawn(#[from] std::io::Error),
}

impl EventError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            EventError::InvalidSubject(_) => ErrorKind::InvalidArgument,
            EventError::Spawn(_) => ErrorKind::ConstraintViolation,
        }
    }
}

/// Result type for event operations.
pub type EventResult<T> = Result<T, EventError>;
