//! Template error types.

use semnet_core::{Addr, ElementType, ErrorKind, GraphError};
use thiserror::Error;

/// Errors that can occur while validating, generating or searching a template.
#[derive(Debug, Error)]
pub enum TemplateError {
    /// Template has no triples.
    #[error("Template is empty")]
    EmptyTemplate,

    /// Alias is referenced but never introduced with an address or type.
    #[error("Alias '{alias}' is never introduced")]
    DanglingAlias { alias: String },

    /// Alias names a slot whose value is already a different alias.
    #[error("Alias '{alias}' is already bound to another slot")]
    AliasRedefined { alias: String },

    /// Type constraint has inconsistent bits.
    #[error("Invalid type {ty} in triple {triple}: {reason}")]
    InvalidType {
        triple: usize,
        ty: ElementType,
        reason: String,
    },

    /// A fixed slot holds the invalid address.
    #[error("Invalid address in triple {triple}, position {position}")]
    InvalidAddress { triple: usize, position: usize },

    /// Parameter names an alias the template does not declare.
    #[error("Unknown parameter '{alias}'")]
    UnknownParam { alias: String },

    /// Parameter value cannot be bound to its alias.
    #[error("Invalid parameter '{alias}': {reason}")]
    InvalidParam { alias: String, reason: String },

    /// A slot needs a value that neither a parameter nor an earlier triple provides.
    #[error("Missing binding for '{alias}' in triple {triple}")]
    MissingBinding { alias: String, triple: usize },

    /// Generation would need to create an element from a type it cannot create there.
    #[error("Cannot create {ty} at position {position} of triple {triple}")]
    CannotCreate {
        triple: usize,
        position: usize,
        ty: ElementType,
    },

    /// A bound edge does not connect the triple's endpoints.
    #[error("Edge {edge} does not connect {from} to {to}")]
    EndpointMismatch { edge: Addr, from: Addr, to: Addr },

    /// Two values were bound to the same alias.
    #[error("Alias '{alias}' bound to both {first} and {second}")]
    ConflictingBinding {
        alias: String,
        first: Addr,
        second: Addr,
    },

    /// Structure has no edge members.
    #[error("Structure {0} has no edge members")]
    EmptyStructure(Addr),

    /// An edge member has an endpoint outside the structure.
    #[error("Edge {edge} of structure {structure} has endpoint {endpoint} outside it")]
    MemberOutsideStructure {
        structure: Addr,
        edge: Addr,
        endpoint: Addr,
    },

    /// Underlying store error.
    #[error(transparent)]
    Graph(#[from] GraphError),
}

impl TemplateError {
    pub fn dangling_alias(alias: impl Into<String>) -> Self {
        Self::DanglingAlias {
            alias: alias.into(),
        }
    }

    pub fn unknown_param(alias: impl Into<String>) -> Self {
        Self::UnknownParam {
            alias: alias.into(),
        }
    }

    pub fn invalid_param(alias: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidParam {
            alias: alias.into(),
            reason: reason.into(),
        }
    }

    pub fn missing_binding(alias: impl Into<String>, triple: usize) -> Self {
        Self::MissingBinding {
            alias: alias.into(),
            triple,
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            TemplateError::MissingBinding { .. }
            | TemplateError::EndpointMismatch { .. }
            | TemplateError::ConflictingBinding { .. }
            | TemplateError::MemberOutsideStructure { .. } => ErrorKind::ConstraintViolation,
            TemplateError::Graph(err) => err.kind(),
            _ => ErrorKind::InvalidArgument,
        }
    }
}

/// Result type for template operations.
pub type TemplateResult<T> = Result<T, TemplateError>;
