use std::sync::Arc;
use tokio::sync::RwLock;

use crate::config::ServerConfig;
use crate::event_store::EventStore;

pub type SharedEventStore = Arc<RwLock<EventStore>>;

#[derive(Clone)]
pub struct AppState {
    pub event_store: SharedEventStore,
    pub config: Arc<ServerConfig>,
}

impl AppState {
    pub fn new(config: ServerConfig) -> Self {
        Self {
            event_store: Arc::new(RwLock::new(EventStore::with_capacity(
                config.max_stored_events,
            ))),
            config: Arc::new(config),
        }
    }
}
