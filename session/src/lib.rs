//! SEMNET Session
//!
//! The process-wide memory and the per-caller context façade.
//!
//! Responsibilities:
//! - Own the shared store and the event manager
//! - Bootstrap the naming relation and seed keynodes
//! - Expose element, iterator, template, naming and event operations
//!   through named `MemoryContext` handles
//! - Load configuration

mod config;
mod context;
mod error;
mod keynodes;
mod memory;
mod naming;

pub use config::MemoryConfig;
pub use context::MemoryContext;
pub use error::{SessionError, SessionResult};
pub use keynodes::Keynodes;
pub use memory::Memory;
pub use semnet_event::{DispatchMode, EventKind, Notification, Subscription};
