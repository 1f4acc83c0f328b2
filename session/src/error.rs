//! Session error types.

use semnet_core::{Addr, ErrorKind};
use thiserror::Error;

/// Session errors.
#[derive(Debug, Error)]
pub enum SessionError {
    /// Store error.
    #[error("graph error: {0}")]
    GraphError(#[from] semnet_core::GraphError),

    /// Iterator error.
    #[error("pattern error: {0}")]
    PatternError(#[from] semnet_pattern::PatternError),

    /// Template error.
    #[error("template error: {0}")]
    TemplateError(#[from] semnet_template::TemplateError),

    /// Event error.
    #[error("event error: {0}")]
    EventError(#[from] semnet_event::EventError),

    /// Configuration could not be parsed.
    #[error("config error: {0}")]
    ConfigError(#[from] serde_json::Error),

    /// Element does not exist.
    #[error("element not found: {0}")]
    ElementNotFound(Addr),

    /// Identifier already names another element.
    #[error("identifier '{idtf}' already names {existing}")]
    IdentifierConflict { idtf: String, existing: Addr },

    /// Identifier is malformed.
    #[error("invalid identifier: {message}")]
    InvalidIdentifier { message: String },
}

impl SessionError {
    pub fn identifier_conflict(idtf: impl Into<String>, existing: Addr) -> Self {
        Self::IdentifierConflict {
            idtf: idtf.into(),
            existing,
        }
    }

    pub fn invalid_identifier(message: impl Into<String>) -> Self {
        Self::InvalidIdentifier {
            message: message.into(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            SessionError::GraphError(err) => err.kind(),
            SessionError::PatternError(err) => err.kind(),
            SessionError::TemplateError(err) => err.kind(),
            SessionError::EventError(err) => err.kind(),
            SessionError::ConfigError(_) | SessionError::InvalidIdentifier { .. } => {
                ErrorKind::InvalidArgument
            }
            SessionError::ElementNotFound(_) => ErrorKind::NotFound,
            SessionError::IdentifierConflict { .. } => ErrorKind::ConstraintViolation,
        }
    }
}

/// Result type for session operations.
pub type SessionResult<T> = Result<T, SessionError>;
