//! SEMNET Integration Test Support
//!
//! Fixtures shared by the integration tests under `tests/`.
//!
//! # Example
//!
//! ```ignore
//! use semnet_tests::prelude::*;
//!
//! #[test]
//! fn test() {
//!     let ctx = fresh_context("example");
//!     let node = ctx.create_node(ElementType::NODE_CONST);
//!     assert!(ctx.is_element(node));
//! }
//! ```

mod fixtures;

pub use fixtures::{fresh_context, fresh_memory, init_logging, manual_memory, wait_until};

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::fixtures::{fresh_context, fresh_memory, init_logging, manual_memory, wait_until};
    pub use semnet_core::{Addr, ElementType, ErrorKind, GraphError, LinkContent};
    pub use semnet_event::{DispatchMode, EventKind, Notification, SubscriptionState};
    pub use semnet_pattern::{IterParam, Iterator3, Iterator5};
    pub use semnet_session::{Memory, MemoryConfig, MemoryContext, SessionError};
    pub use semnet_template::{
        AliasExt, SearchResult, Template, TemplateBindings, TemplateError, TemplateItem,
        TemplateParams,
    };
}
