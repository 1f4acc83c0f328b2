//! Link payloads.
//!
//! A link carries exactly one payload variant. Typed accessors fail with
//! `GraphError::TypeMismatch` when the stored variant differs from the one
//! requested; there is no implicit conversion between variants.

use crate::{GraphError, GraphResult};
use serde::{Deserialize, Serialize};
use std::fmt;

/// The content stored in a link.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum LinkContent {
    /// 64-bit signed integer.
    Int(i64),
    /// IEEE double.
    Float(f64),
    /// UTF-8 text.
    String(String),
    /// Raw byte sequence.
    Bytes(Vec<u8>),
}

impl LinkContent {
    /// Returns the variant name of this content.
    pub fn type_name(&self) -> &'static str {
        match self {
            LinkContent::Int(_) => "Int",
            LinkContent::Float(_) => "Float",
            LinkContent::String(_) => "String",
            LinkContent::Bytes(_) => "Bytes",
        }
    }

    pub fn is_int(&self) -> bool {
        matches!(self, LinkContent::Int(_))
    }

    pub fn is_float(&self) -> bool {
        matches!(self, LinkContent::Float(_))
    }

    pub fn is_string(&self) -> bool {
        matches!(self, LinkContent::String(_))
    }

    pub fn is_bytes(&self) -> bool {
        matches!(self, LinkContent::Bytes(_))
    }

    /// Get the integer payload.
    pub fn as_int(&self) -> GraphResult<i64> {
        match self {
            LinkContent::Int(i) => Ok(*i),
            other => Err(other.mismatch("Int")),
        }
    }

    /// Get the float payload.
    pub fn as_float(&self) -> GraphResult<f64> {
        match self {
            LinkContent::Float(f) => Ok(*f),
            other => Err(other.mismatch("Float")),
        }
    }

    /// Get the text payload.
    pub fn as_str(&self) -> GraphResult<&str> {
        match self {
            LinkContent::String(s) => Ok(s),
            other => Err(other.mismatch("String")),
        }
    }

    /// Get the raw byte payload.
    pub fn as_bytes(&self) -> GraphResult<&[u8]> {
        match self {
            LinkContent::Bytes(b) => Ok(b),
            other => Err(other.mismatch("Bytes")),
        }
    }

    fn mismatch(&self, expected: &str) -> GraphError {
        GraphError::type_mismatch(expected, self.type_name())
    }
}

impl fmt::Display for LinkContent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LinkContent::Int(i) => write!(f, "{}", i),
            LinkContent::Float(fl) => write!(f, "{}", fl),
            LinkContent::String(s) => write!(f, "\"{}\"", s),
            LinkContent::Bytes(b) => write!(f, "<{} bytes>", b.len()),
        }
    }
}

impl From<i64> for LinkContent {
    fn from(i: i64) -> Self {
        LinkContent::Int(i)
    }
}

impl From<i32> for LinkContent {
    fn from(i: i32) -> Self {
        LinkContent::Int(i as i64)
    }
}

impl From<f64> for LinkContent {
    fn from(f: f64) -> Self {
        LinkContent::Float(f)
    }
}

impl From<String> for LinkContent {
    fn from(s: String) -> Self {
        LinkContent::String(s)
    }
}

impl From<&str> for LinkContent {
    fn from(s: &str) -> Self {
        LinkContent::String(s.to_string())
    }
}

impl From<Vec<u8>> for LinkContent {
    fn from(b: Vec<u8>) -> Self {
        LinkContent::Bytes(b)
    }
}

impl From<&[u8]> for LinkContent {
    fn from(b: &[u8]) -> Self {
        LinkContent::Bytes(b.to_vec())
    }
}
