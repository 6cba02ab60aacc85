//! Application state shared across handlers.

use std::sync::Arc;

use catalog_store::Store;

use crate::config::ServerConfig;
use crate::request_log::RequestLog;

/// Application state shared across all handlers.
///
/// This is cloneable and can be extracted in handlers using `State<AppState>`.
#[derive(Clone)]
pub struct AppState {
    /// Database store.
    store: Arc<Store>,
    /// Server configuration.
    config: Arc<ServerConfig>,
    /// Best-effort request log.
    request_log: Arc<RequestLog>,
}

impl AppState {
    /// Create new application state.
    pub fn new(store: Store, config: ServerConfig) -> Self {
        let request_log = RequestLog::new(&config.request_log_path);
        Self {
            store: Arc::new(store),
            config: Arc::new(config),
            request_log: Arc::new(request_log),
        }
    }

    /// Get a reference to the database store.
    pub fn store(&self) -> &Store {
        &self.store
    }

    /// Get a reference to the server configuration.
    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    /// Get a reference to the request log.
    pub fn request_log(&self) -> &RequestLog {
        &self.request_log
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
