//! SEMNET Pattern
//!
//! Fixed-shape matchers over the shared store.
//!
//! Responsibilities:
//! - Iterate (source, edge, target) triples matching three parameters
//! - Iterate quintuples: a triple whose edge is the target of a second,
//!   attribute triple
//! - Report malformed parameters before iteration starts

mod error;
mod iterator;
mod param;

pub use error::{PatternError, PatternResult};
pub use iterator::{Iterator3, Iterator5};
pub use param::IterParam;
