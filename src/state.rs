//! Application state management
//!
//! Shared state passed to all request handlers via Axum's State extractor.

use std::sync::Arc;

use crate::{config::Config, db::Storage};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

/// Inner state (wrapped in Arc for cheap cloning)
struct AppStateInner {
    /// Storage backend selected at startup
    pub storage: Arc<dyn Storage>,

    /// Application configuration
    pub config: Config,
}

impl AppState {
    /// Create a new application state
    pub fn new(storage: Arc<dyn Storage>, config: Config) -> Self {
        Self {
            inner: Arc::new(AppStateInner { storage, config }),
        }
    }

    /// Get a reference to the storage backend
    pub fn storage(&self) -> &dyn Storage {
        self.inner.storage.as_ref()
    }

    /// Get a reference to the configuration
    pub fn config(&self) -> &Config {
        &self.inner.config
    }
}
