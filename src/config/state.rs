// Application state module
// Shared, read-only state handed to every connection

use std::sync::atomic::AtomicUsize;

use super::types::Config;
use crate::handler::{AssetStore, Dispatcher};

/// Application state
pub struct AppState {
    pub config: Config,
    pub dispatcher: Dispatcher,
    /// Connections currently being served
    pub active_connections: AtomicUsize,
}

impl AppState {
    /// Build state with the default GET/HEAD/POST policies
    pub fn new(config: &Config) -> Self {
        let assets = AssetStore::new(&config.asset.path, config.asset.cache);
        Self::with_dispatcher(config, Dispatcher::with_defaults(assets))
    }

    pub fn with_dispatcher(config: &Config, dispatcher: Dispatcher) -> Self {
        Self {
            config: config.clone(),
            dispatcher,
            active_connections: AtomicUsize::new(0),
        }
    }
}
