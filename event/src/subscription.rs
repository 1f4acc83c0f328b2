//! Subscriptions and their lifecycle.

use crate::manager::Registry;
use crate::{EventKind, Notification};
use parking_lot::ReentrantMutex;
use semnet_core::{Addr, ElementType};
use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::{Arc, Weak};
use tracing::{trace, warn};

/// Callback invoked for each matching notification.
pub(crate) type Callback = Box<dyn Fn(&Notification) + Send + Sync>;

/// Lifecycle of a subscription: `Registered -> Active -> Unsubscribed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubscriptionState {
    Registered,
    Active,
    Unsubscribed,
}

impl SubscriptionState {
    fn from_u8(raw: u8) -> Self {
        match raw {
            0 => SubscriptionState::Registered,
            1 => SubscriptionState::Active,
            _ => SubscriptionState::Unsubscribed,
        }
    }
}

pub(crate) struct SubscriptionInner {
    pub(crate) id: u64,
    pub(crate) subject: Addr,
    pub(crate) kind: EventKind,
    edge_type: ElementType,
    state: AtomicU8,
    /// Held while the callback runs and while unsubscribing, so that once
    /// `unsubscribe` returns the callback is never entered again. Re-entrant
    /// so a callback may unsubscribe itself.
    gate: ReentrantMutex<()>,
    callback: Callback,
}

impl SubscriptionInner {
    pub(crate) fn new(
        id: u64,
        subject: Addr,
        kind: EventKind,
        edge_type: ElementType,
        callback: Callback,
    ) -> Self {
        Self {
            id,
            subject,
            kind,
            edge_type,
            state: AtomicU8::new(SubscriptionState::Registered as u8),
            gate: ReentrantMutex::new(()),
            callback,
        }
    }

    pub(crate) fn state(&self) -> SubscriptionState {
        SubscriptionState::from_u8(self.state.load(Ordering::Acquire))
    }

    pub(crate) fn activate(&self) {
        let _ = self.state.compare_exchange(
            SubscriptionState::Registered as u8,
            SubscriptionState::Active as u8,
            Ordering::AcqRel,
            Ordering::Acquire,
        );
    }

    /// Invoke the callback if the subscription is still active and the
    /// notification passes its edge type filter. Returns true if invoked.
    pub(crate) fn deliver(&self, notification: &Notification) -> bool {
        let _gate = self.gate.lock();
        if self.state() != SubscriptionState::Active {
            return false;
        }
        if !notification.edge_type.matches(self.edge_type) {
            return false;
        }
        let outcome = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            (self.callback)(notification)
        }));
        if outcome.is_err() {
            warn!(
                subscription = self.id,
                kind = %self.kind,
                "event callback panicked"
            );
        }
        true
    }

    /// Move to the terminal state. Returns false if already there.
    pub(crate) fn close(&self) -> bool {
        let _gate = self.gate.lock();
        let previous = self
            .state
            .swap(SubscriptionState::Unsubscribed as u8, Ordering::AcqRel);
        previous != SubscriptionState::Unsubscribed as u8
    }
}

/// Handle to a registered callback. Dropping it unsubscribes.
pub struct Subscription {
    pub(crate) inner: Arc<SubscriptionInner>,
    pub(crate) registry: Weak<Registry>,
}

impl Subscription {
    pub fn id(&self) -> u64 {
        self.inner.id
    }

    pub fn subject(&self) -> Addr {
        self.inner.subject
    }

    pub fn kind(&self) -> EventKind {
        self.inner.kind
    }

    pub fn state(&self) -> SubscriptionState {
        self.inner.state()
    }

    pub fn is_active(&self) -> bool {
        self.state() == SubscriptionState::Active
    }

    /// Stop delivery. Waits for an in-flight callback of this subscription
    /// to return; no callback starts afterwards. Idempotent.
    pub fn unsubscribe(&self) {
        if !self.inner.close() {
            return;
        }
        if let Some(registry) = self.registry.upgrade() {
            registry.remove(&self.inner);
        }
        trace!(subscription = self.inner.id, "unsubscribed");
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.unsubscribe();
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("id", &self.inner.id)
            .field("subject", &self.inner.subject)
            .field("kind", &self.inner.kind)
            .field("state", &self.state())
            .finish()
    }
}
