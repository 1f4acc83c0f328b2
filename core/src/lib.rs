//! SEMNET Core Types
//!
//! This crate provides the foundational types used throughout SEMNET:
//! - Addresses (Addr) with the distinguished invalid value
//! - Element types (the ElementType bitmask with subsumption rules)
//! - Link payloads (the LinkContent sum type)
//! - Element records (nodes, edges, links)
//! - Common error types

mod addr;
mod content;
mod element;
mod error;
mod types;

pub use addr::*;
pub use content::*;
pub use element::*;
pub use error::*;
pub use types::*;
