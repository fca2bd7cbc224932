//! Application state shared across handlers.

use std::sync::Arc;

use crate::config::StoreConfig;
use crate::db::ProductStore;

/// Application state shared across all handlers.
///
/// Cheaply cloneable via `Arc`; holds the configuration and the
/// product catalog backend.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StoreConfig,
    catalog: Box<dyn ProductStore>,
}

impl AppState {
    /// Create a new application state.
    #[must_use]
    pub fn new(config: StoreConfig, catalog: Box<dyn ProductStore>) -> Self {
        Self {
            inner: Arc::new(AppStateInner { config, catalog }),
        }
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StoreConfig {
        &self.inner.config
    }

    /// Get a reference to the product catalog.
    #[must_use]
    pub fn catalog(&self) -> &dyn ProductStore {
        self.inner.catalog.as_ref()
    }
}
