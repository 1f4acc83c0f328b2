//! SEMNET Template
//!
//! Declarative multi-triple patterns over the shared store.
//!
//! Responsibilities:
//! - Build templates from triples of addresses, type constraints and aliases
//! - Generate: materialize the missing elements of a template as one unit
//! - Search: enumerate every alias assignment satisfying all triples
//! - Reconstruct a template from a structure node and its members

mod bindings;
mod build;
mod error;
mod generate;
mod item;
mod search;
mod template;

pub use bindings::{SearchResult, TemplateBindings, TemplateParams};
pub use build::build_template;
pub use error::{TemplateError, TemplateResult};
pub use generate::generate;
pub use item::{AliasExt, ItemValue, TemplateItem};
pub use search::{search, search_in_struct, search_with_params};
pub use template::Template;
