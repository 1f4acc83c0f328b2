//! Event queue and dispatcher.

use crate::subscription::{Callback, SubscriptionInner};
use crate::{EventError, EventKind, EventResult, Notification, Subscription};
use crossbeam::channel::{self, Receiver, RecvTimeoutError, SendTimeoutError, Sender};
use parking_lot::{Mutex, RwLock};
use semnet_core::{Addr, ElementType};
use semnet_graph::{ChangeSink, StructuralChange};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;
use tracing::{debug, trace, warn};

/// How often the dispatcher thread re-checks its shutdown flag.
const IDLE_POLL: Duration = Duration::from_millis(100);

/// Where queued notifications are delivered.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DispatchMode {
    /// A dedicated thread drains the queue.
    #[default]
    Thread,
    /// The caller drains the queue with `dispatch_pending` or `poll`.
    Manual,
}

/// Delivery counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EventStats {
    /// Callbacks invoked.
    pub delivered: u64,
    /// Notifications dropped because the queue stayed full.
    pub dropped: u64,
    /// Live subscriptions.
    pub subscriptions: usize,
}

type SubscriptionKey = (Addr, EventKind);

/// Live subscriptions, shared with the dispatcher thread.
#[derive(Default)]
pub(crate) struct Registry {
    subscriptions: RwLock<HashMap<SubscriptionKey, Vec<Arc<SubscriptionInner>>>>,
    delivered: AtomicU64,
}

impl Registry {
    fn insert(&self, inner: Arc<SubscriptionInner>) {
        self.subscriptions
            .write()
            .entry((inner.subject, inner.kind))
            .or_default()
            .push(inner);
    }

    pub(crate) fn remove(&self, inner: &SubscriptionInner) {
        let key = (inner.subject, inner.kind);
        let mut subscriptions = self.subscriptions.write();
        if let Some(list) = subscriptions.get_mut(&key) {
            list.retain(|sub| sub.id != inner.id);
            if list.is_empty() {
                subscriptions.remove(&key);
            }
        }
    }

    fn is_watched(&self, subject: Addr, kind: EventKind) -> bool {
        self.subscriptions.read().contains_key(&(subject, kind))
    }

    fn count(&self) -> usize {
        self.subscriptions.read().values().map(Vec::len).sum()
    }

    fn dispatch(&self, notification: &Notification) {
        let targets: Vec<Arc<SubscriptionInner>> = self
            .subscriptions
            .read()
            .get(&(notification.subject, notification.kind))
            .cloned()
            .unwrap_or_default();
        for sub in targets {
            if sub.deliver(notification) {
                self.delivered.fetch_add(1, Ordering::Relaxed);
            }
        }
    }
}

/// Routes structural changes to subscribed callbacks.
///
/// Register it on a store with `Store::add_sink`. Notifications with no
/// subscriber are discarded at publish time; the rest are queued on a
/// bounded channel. A full queue blocks the publishing thread for at most
/// the enqueue timeout, after which the notification is dropped.
pub struct EventManager {
    registry: Arc<Registry>,
    sender: Sender<Notification>,
    receiver: Receiver<Notification>,
    enqueue_timeout: Duration,
    mode: DispatchMode,
    next_id: AtomicU64,
    dropped: AtomicU64,
    shutdown: Arc<AtomicBool>,
    dispatcher: Mutex<Option<JoinHandle<()>>>,
}

impl EventManager {
    /// Create a manager. In [`DispatchMode::Thread`] this starts the
    /// dispatcher thread.
    pub fn new(capacity: usize, enqueue_timeout: Duration, mode: DispatchMode) -> EventResult<Self> {
        let (sender, receiver) = channel::bounded(capacity.max(1));
        let registry = Arc::new(Registry::default());
        let shutdown = Arc::new(AtomicBool::new(false));

        let dispatcher = match mode {
            DispatchMode::Thread => {
                let receiver: Receiver<Notification> = receiver.clone();
                let registry = Arc::clone(&registry);
                let shutdown = Arc::clone(&shutdown);
                let handle = thread::Builder::new()
                    .name("semnet-events".to_string())
                    .spawn(move || {
                        while !shutdown.load(Ordering::Relaxed) {
                            match receiver.recv_timeout(IDLE_POLL) {
                                Ok(notification) => registry.dispatch(&notification),
                                Err(RecvTimeoutError::Timeout) => continue,
                                Err(RecvTimeoutError::Disconnected) => break,
                            }
                        }
                    })?;
                Some(handle)
            }
            DispatchMode::Manual => None,
        };

        debug!(capacity, ?mode, "event manager started");
        Ok(Self {
            registry,
            sender,
            receiver,
            enqueue_timeout,
            mode,
            next_id: AtomicU64::new(1),
            dropped: AtomicU64::new(0),
            shutdown,
            dispatcher: Mutex::new(dispatcher),
        })
    }

    pub fn mode(&self) -> DispatchMode {
        self.mode
    }

    /// Register `callback` for `kind` events on `subject`.
    pub fn subscribe<F>(&self, subject: Addr, kind: EventKind, callback: F) -> EventResult<Subscription>
    where
        F: Fn(&Notification) + Send + Sync + 'static,
    {
        self.subscribe_filtered(subject, kind, ElementType::UNKNOWN, callback)
    }

    /// Like [`EventManager::subscribe`], delivering only edges whose type
    /// matches `edge_type`.
    pub fn subscribe_filtered<F>(
        &self,
        subject: Addr,
        kind: EventKind,
        edge_type: ElementType,
        callback: F,
    ) -> EventResult<Subscription>
    where
        F: Fn(&Notification) + Send + Sync + 'static,
    {
        if !subject.is_valid() {
            return Err(EventError::InvalidSubject(subject));
        }
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let callback: Callback = Box::new(callback);
        let inner = Arc::new(SubscriptionInner::new(id, subject, kind, edge_type, callback));

        self.registry.insert(Arc::clone(&inner));
        inner.activate();
        debug!(subscription = id, subject = subject.to_int(), %kind, "subscribed");

        Ok(Subscription {
            inner,
            registry: Arc::downgrade(&self.registry),
        })
    }

    /// Stop delivery to `subscription`.
    pub fn unsubscribe(&self, subscription: &Subscription) {
        subscription.unsubscribe();
    }

    /// Queue a notification if anyone is waiting for it.
    fn enqueue(&self, notification: Notification) {
        if !self.registry.is_watched(notification.subject, notification.kind) {
            return;
        }
        match self.sender.send_timeout(notification, self.enqueue_timeout) {
            Ok(()) => trace!(
                subject = notification.subject.to_int(),
                kind = %notification.kind,
                "queued notification"
            ),
            Err(SendTimeoutError::Timeout(_)) => {
                self.dropped.fetch_add(1, Ordering::Relaxed);
                warn!(
                    subject = notification.subject.to_int(),
                    kind = %notification.kind,
                    capacity = self.sender.capacity().unwrap_or(0),
                    "event queue full, notification dropped"
                );
            }
            Err(SendTimeoutError::Disconnected(_)) => {}
        }
    }

    /// Deliver every queued notification on the calling thread.
    /// Does nothing in [`DispatchMode::Thread`]. Returns the number drained.
    pub fn dispatch_pending(&self) -> usize {
        if self.mode != DispatchMode::Manual {
            return 0;
        }
        let mut drained = 0;
        while let Ok(notification) = self.receiver.try_recv() {
            self.registry.dispatch(&notification);
            drained += 1;
        }
        drained
    }

    /// Wait up to `timeout` for a notification, then deliver everything
    /// queued. Does nothing in [`DispatchMode::Thread`].
    pub fn poll(&self, timeout: Duration) -> usize {
        if self.mode != DispatchMode::Manual {
            return 0;
        }
        match self.receiver.recv_timeout(timeout) {
            Ok(notification) => {
                self.registry.dispatch(&notification);
                1 + self.dispatch_pending()
            }
            Err(_) => 0,
        }
    }

    /// Number of notifications waiting in the queue.
    pub fn queue_len(&self) -> usize {
        self.receiver.len()
    }

    pub fn stats(&self) -> EventStats {
        EventStats {
            delivered: self.registry.delivered.load(Ordering::Relaxed),
            dropped: self.dropped.load(Ordering::Relaxed),
            subscriptions: self.registry.count(),
        }
    }

    /// Stop the dispatcher thread. Queued notifications are discarded.
    pub fn shutdown(&self) {
        self.shutdown.store(true, Ordering::SeqCst);
        if let Some(handle) = self.dispatcher.lock().take() {
            if handle.thread().id() != thread::current().id() && handle.join().is_err() {
                warn!("event dispatcher thread panicked");
            }
        }
    }
}

impl ChangeSink for EventManager {
    fn publish(&self, change: &StructuralChange) {
        for notification in Notification::from_change(change) {
            self.enqueue(notification);
        }
    }
}

impl Drop for EventManager {
    fn drop(&mut self) {
        self.shutdown();
    }
}

impl std::fmt::Debug for EventManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventManager")
            .field("mode", &self.mode)
            .field("queued", &self.queue_len())
            .field("stats", &self.stats())
            .finish()
    }
}
