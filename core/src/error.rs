//! Common error types for SEMNET.

use crate::{Addr, ElementType};
use thiserror::Error;

/// Broad classes of failure shared by every layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Malformed type, dangling alias, wrong payload accessor.
    InvalidArgument,
    /// The addressed element or identifier does not exist.
    NotFound,
    /// An operation would break a structural invariant.
    ConstraintViolation,
}

/// Errors that can occur during graph operations.
#[derive(Debug, Error)]
pub enum GraphError {
    /// Element not found.
    #[error("Element not found: {0}")]
    ElementNotFound(Addr),

    /// The invalid address was passed where an element is required.
    #[error("Invalid address")]
    InvalidAddress,

    /// Type bits are inconsistent or unsuitable for the element kind.
    #[error("Invalid type {ty}: {reason}")]
    InvalidType { ty: ElementType, reason: String },

    /// Edge endpoint does not exist.
    #[error("Edge endpoint {0} does not exist")]
    MissingEndpoint(Addr),

    /// The element is not a link.
    #[error("Element {0} is not a link")]
    NotALink(Addr),

    /// Type mismatch in link content.
    #[error("Type mismatch: expected {expected}, got {actual}")]
    TypeMismatch { expected: String, actual: String },
}

impl GraphError {
    pub fn invalid_type(ty: ElementType, reason: impl Into<String>) -> Self {
        Self::InvalidType {
            ty,
            reason: reason.into(),
        }
    }

    pub fn type_mismatch(expected: impl Into<String>, actual: impl Into<String>) -> Self {
        Self::TypeMismatch {
            expected: expected.into(),
            actual: actual.into(),
        }
    }

    /// Classify this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            GraphError::ElementNotFound(_) => ErrorKind::NotFound,
            GraphError::MissingEndpoint(_) => ErrorKind::ConstraintViolation,
            GraphError::InvalidAddress
            | GraphError::InvalidType { .. }
            | GraphError::NotALink(_)
            | GraphError::TypeMismatch { .. } => ErrorKind::InvalidArgument,
        }
    }
}

/// Result type for graph operations.
pub type GraphResult<T> = Result<T, GraphError>;
