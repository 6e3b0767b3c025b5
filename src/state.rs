//! Application state management

use std::sync::Arc;

use crate::config::Config;
use crate::storage::FileStore;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: Config,
    store: FileStore,
}

impl AppState {
    /// Create a new application state rooted at the configured storage directory
    pub fn new(config: Config) -> Self {
        let store = FileStore::new(config.storage.root.clone());

        Self {
            inner: Arc::new(AppStateInner { config, store }),
        }
    }

    /// Get the configuration
    pub fn config(&self) -> &Config {
        &self.inner.config
    }

    /// Get the file store
    pub fn store(&self) -> &FileStore {
        &self.inner.store
    }
}
