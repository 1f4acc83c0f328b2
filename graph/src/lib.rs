//! SEMNET Graph Storage
//!
//! This crate provides the shared element table with indexed access:
//! - Element storage: nodes, edges and links keyed by address
//! - Type index: Find elements by type subsumption
//! - Adjacency index: Find edges from/to an element, filtered by edge type
//! - Content index: Find links by exact payload
//! - Change sinks: Observe structural changes as they happen
//!
//! Every index sits behind its own lock, so the store is shared by
//! reference between any number of readers and writers.

mod index;
mod store;

pub use store::*;
