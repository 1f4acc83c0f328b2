//! Iterator parameters.

use crate::{PatternError, PatternResult};
use semnet_core::{Addr, ElementType};
use std::fmt;

/// One position of an iterator shape: a fixed address or a type constraint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IterParam {
    /// Matches exactly this element.
    Addr(Addr),
    /// Matches any element whose type is subsumed by this one.
    Type(ElementType),
}

impl IterParam {
    pub fn is_fixed(&self) -> bool {
        matches!(self, IterParam::Addr(_))
    }

    /// Get the fixed address, if any.
    pub fn addr(&self) -> Option<Addr> {
        match self {
            IterParam::Addr(addr) => Some(*addr),
            IterParam::Type(_) => None,
        }
    }

    /// The type constraint, or the wildcard for a fixed address.
    pub fn requested_type(&self) -> ElementType {
        match self {
            IterParam::Addr(_) => ElementType::UNKNOWN,
            IterParam::Type(ty) => *ty,
        }
    }

    /// Check that this parameter can be used at `position`.
    pub(crate) fn validate(&self, position: usize) -> PatternResult<()> {
        match self {
            IterParam::Addr(addr) if !addr.is_valid() => {
                Err(PatternError::invalid_address(position))
            }
            IterParam::Type(ty) => match ty.conflict() {
                Some(reason) => Err(PatternError::invalid_type(position, reason)),
                None => Ok(()),
            },
            IterParam::Addr(_) => Ok(()),
        }
    }

    /// Check a candidate element against this parameter.
    pub(crate) fn accepts(&self, addr: Addr, ty: ElementType) -> bool {
        match self {
            IterParam::Addr(fixed) => *fixed == addr,
            IterParam::Type(requested) => ty.matches(*requested),
        }
    }
}

impl From<Addr> for IterParam {
    fn from(addr: Addr) -> Self {
        IterParam::Addr(addr)
    }
}

impl From<ElementType> for IterParam {
    fn from(ty: ElementType) -> Self {
        IterParam::Type(ty)
    }
}

impl fmt::Display for IterParam {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IterParam::Addr(addr) => write!(f, "{}", addr),
            IterParam::Type(ty) => write!(f, "<{}>", ty),
        }
    }
}
