//! Test fixtures.

use semnet_event::DispatchMode;
use semnet_session::{Memory, MemoryConfig, MemoryContext};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};
use tracing_subscriber::EnvFilter;

/// Install a fmt subscriber honouring `RUST_LOG`. Safe to call repeatedly.
pub fn init_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_test_writer()
        .try_init();
}

/// A new memory with a dispatcher thread.
pub fn fresh_memory() -> Arc<Memory> {
    init_logging();
    Memory::new(MemoryConfig::default()).expect("memory initialization failed")
}

/// A new memory whose queue is drained by the caller.
pub fn manual_memory() -> Arc<Memory> {
    init_logging();
    Memory::new(MemoryConfig::new().with_dispatch(DispatchMode::Manual))
        .expect("memory initialization failed")
}

/// A context on a fresh threaded memory.
pub fn fresh_context(name: &str) -> MemoryContext {
    fresh_memory().context(name)
}

/// Poll `condition` until it holds or `timeout` elapses.
pub fn wait_until(timeout: Duration, mut condition: impl FnMut() -> bool) -> bool {
    let deadline = Instant::now() + timeout;
    loop {
        if condition() {
            return true;
        }
        if Instant::now() >= deadline {
            return false;
        }
        thread::sleep(Duration::from_millis(5));
    }
}
