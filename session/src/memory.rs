//! The shared memory owning the store and the event manager.

use crate::keynodes::NREL_SYSTEM_IDENTIFIER;
use crate::naming::Naming;
use crate::{Keynodes, MemoryConfig, MemoryContext, SessionResult};
use semnet_event::EventManager;
use semnet_graph::{ChangeSink, Store};
use std::sync::{Arc, OnceLock};
use tracing::info;

static GLOBAL: OnceLock<Arc<Memory>> = OnceLock::new();

/// One semantic memory. Contexts created from it share its graph.
pub struct Memory {
    config: MemoryConfig,
    store: Arc<Store>,
    events: Arc<EventManager>,
    pub(crate) naming: Naming,
    keynodes: Keynodes,
}

impl Memory {
    /// Initialize a memory: start event delivery, bootstrap the naming
    /// relation and seed the configured keynodes.
    pub fn new(config: MemoryConfig) -> SessionResult<Arc<Self>> {
        let store = Arc::new(Store::new());
        let events = Arc::new(EventManager::new(
            config.event_queue_capacity,
            config.enqueue_timeout(),
            config.dispatch,
        )?);
        store.add_sink(Arc::clone(&events) as Arc<dyn ChangeSink>);

        let naming = Naming::bootstrap(&store, NREL_SYSTEM_IDENTIFIER)?;
        let keynodes = Keynodes::seed(
            &store,
            &naming,
            config.keynodes.iter().map(String::as_str),
        )?;

        info!(
            keynodes = keynodes.len(),
            dispatch = ?config.dispatch,
            queue_capacity = config.event_queue_capacity,
            "memory initialized"
        );

        Ok(Arc::new(Self {
            config,
            store,
            events,
            naming,
            keynodes,
        }))
    }

    /// Process-wide memory with the default configuration, created on
    /// first use.
    pub fn global() -> SessionResult<Arc<Self>> {
        if let Some(memory) = GLOBAL.get() {
            return Ok(Arc::clone(memory));
        }
        let memory = Self::new(MemoryConfig::default())?;
        Ok(Arc::clone(GLOBAL.get_or_init(|| memory)))
    }

    /// Open a named context on this memory.
    pub fn context(self: &Arc<Self>, name: impl Into<String>) -> MemoryContext {
        MemoryContext::new(name, Arc::clone(self))
    }

    pub fn config(&self) -> &MemoryConfig {
        &self.config
    }

    pub fn store(&self) -> &Arc<Store> {
        &self.store
    }

    pub fn events(&self) -> &Arc<EventManager> {
        &self.events
    }

    pub fn keynodes(&self) -> &Keynodes {
        &self.keynodes
    }
}

impl std::fmt::Debug for Memory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Memory")
            .field("config", &self.config)
            .field("stats", &self.store.stats())
            .field("keynodes", &self.keynodes.len())
            .finish()
    }
}
