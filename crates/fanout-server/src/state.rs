use fanout_core::{Engine, Registry};
use std::sync::Arc;

/// Shared application state passed to all route handlers.
///
/// The registry is read-only after load and the engine holds no mutable
/// state across executions, so concurrent requests need no locking.
#[derive(Clone)]
pub struct AppState {
    pub registry: Arc<Registry>,
    pub engine: Engine,
}

impl AppState {
    pub fn new(registry: Arc<Registry>, engine: Engine) -> Self {
        Self { registry, engine }
    }
}
