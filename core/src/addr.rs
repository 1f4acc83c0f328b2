//! Addresses of graph elements.
//!
//! An address is a 64-bit handle that is:
//! - Unique for the lifetime of the element it denotes
//! - Never zero for a real element (zero is the invalid address)
//! - Opaque to external users

use serde::{Deserialize, Serialize};
use std::fmt;

/// Handle identifying a node, edge or link.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Addr(u64);

impl Addr {
    /// The address that denotes no element.
    pub const INVALID: Addr = Addr(0);

    /// Create an address from a raw value.
    pub fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// Get the raw value.
    pub fn raw(&self) -> u64 {
        self.0
    }

    /// Integer form used for hashing, logging and the wire.
    pub fn to_int(&self) -> u64 {
        self.0
    }

    /// Returns true unless this is the invalid address.
    pub fn is_valid(&self) -> bool {
        self.0 != 0
    }
}

impl From<Addr> for u64 {
    fn from(addr: Addr) -> Self {
        addr.0
    }
}

impl From<u64> for Addr {
    fn from(raw: u64) -> Self {
        Addr(raw)
    }
}

impl fmt::Display for Addr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_valid() {
            write!(f, "#{}", self.0)
        } else {
            write!(f, "#invalid")
        }
    }
}
