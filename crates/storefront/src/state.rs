//! Application state shared across handlers.

use std::sync::Arc;

use crate::config::StorefrontConfig;
use crate::storage::UserStorage;
use crate::store::StoreRegistry;

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to
/// shared resources like durable storage, live session stores, and
/// configuration.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    storage: Arc<dyn UserStorage>,
    stores: StoreRegistry,
}

impl AppState {
    /// Create a new application state.
    ///
    /// # Arguments
    ///
    /// * `config` - Storefront configuration
    /// * `storage` - Durable per-user storage backend
    #[must_use]
    pub fn new(config: StorefrontConfig, storage: Arc<dyn UserStorage>) -> Self {
        let stores = StoreRegistry::new(
            storage.clone(),
            config.store_options(),
            config.store_idle_timeout(),
        );

        Self {
            inner: Arc::new(AppStateInner {
                config,
                storage,
                stores,
            }),
        }
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Get a reference to the durable storage backend.
    #[must_use]
    pub fn storage(&self) -> &dyn UserStorage {
        self.inner.storage.as_ref()
    }

    /// Get a reference to the live session stores.
    #[must_use]
    pub fn stores(&self) -> &StoreRegistry {
        &self.inner.stores
    }
}
