//! Memory configuration.

use crate::SessionResult;
use semnet_event::DispatchMode;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Identifiers resolved (and created if missing) when a memory starts.
pub const DEFAULT_KEYNODES: &[&str] = &[
    "nrel_system_identifier",
    "sc_result",
    "sc_result_ok",
    "sc_result_error",
    "question",
    "question_initiated",
    "question_finished",
    "nrel_inclusion",
];

/// Configuration for a [`crate::Memory`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MemoryConfig {
    /// Bound of the notification queue
    pub event_queue_capacity: usize,
    /// How long a publisher waits on a full queue before dropping (ms)
    pub enqueue_timeout_ms: u64,
    /// Who drains the notification queue
    pub dispatch: DispatchMode,
    /// System identifiers seeded at initialization
    pub keynodes: Vec<String>,
}

impl Default for MemoryConfig {
    fn default() -> Self {
        Self {
            event_queue_capacity: 1024,
            enqueue_timeout_ms: 100,
            dispatch: DispatchMode::Thread,
            keynodes: DEFAULT_KEYNODES.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl MemoryConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a JSON document; missing fields take their defaults.
    pub fn from_json(json: &str) -> SessionResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn with_event_queue_capacity(mut self, capacity: usize) -> Self {
        self.event_queue_capacity = capacity;
        self
    }

    pub fn with_enqueue_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.enqueue_timeout_ms = timeout_ms;
        self
    }

    pub fn with_dispatch(mut self, dispatch: DispatchMode) -> Self {
        self.dispatch = dispatch;
        self
    }

    /// Add a keynode to seed.
    pub fn with_keynode(mut self, idtf: impl Into<String>) -> Self {
        let idtf = idtf.into();
        if !self.keynodes.contains(&idtf) {
            self.keynodes.push(idtf);
        }
        self
    }

    pub fn enqueue_timeout(&self) -> Duration {
        Duration::from_millis(self.enqueue_timeout_ms)
    }
}
