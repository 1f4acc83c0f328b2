//! SEMNET Events
//!
//! Structural-change notifications delivered to subscribed callbacks.
//!
//! The store publishes every change to the [`EventManager`], which keeps
//! only those some subscription is waiting for and queues them on a
//! bounded channel. A dispatcher drains the queue in order, either on its
//! own thread or on the caller's thread through
//! [`EventManager::dispatch_pending`].

mod error;
mod manager;
mod notification;
mod subscription;

pub use error::{EventError, EventResult};
pub use manager::{DispatchMode, EventManager, EventStats};
pub use notification::{EventKind, Notification};
pub use subscription::{Subscription, SubscriptionState};
