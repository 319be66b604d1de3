//! Application state shared across handlers.

use std::sync::Arc;

use pampa_core::store::{AuthProvider, DocumentStore};

use crate::config::StorefrontConfig;
use crate::services::shipping::ShippingService;

/// Application state shared across all handlers.
///
/// Cheaply cloneable via `Arc`; gives handlers access to configuration,
/// the document store, the auth provider and the shipping service (which
/// owns the zone-table cache).
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    store: Arc<dyn DocumentStore>,
    auth: Arc<dyn AuthProvider>,
    shipping: ShippingService,
}

impl AppState {
    /// Create a new application state.
    #[must_use]
    pub fn new(
        config: StorefrontConfig,
        store: Arc<dyn DocumentStore>,
        auth: Arc<dyn AuthProvider>,
    ) -> Self {
        let shipping = ShippingService::new(Arc::clone(&store));
        Self {
            inner: Arc::new(AppStateInner {
                config,
                store,
                auth,
                shipping,
            }),
        }
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Get a reference to the document store.
    #[must_use]
    pub fn store(&self) -> &Arc<dyn DocumentStore> {
        &self.inner.store
    }

    /// Get a reference to the auth provider.
    #[must_use]
    pub fn auth(&self) -> &Arc<dyn AuthProvider> {
        &self.inner.auth
    }

    /// Get a reference to the shipping service.
    #[must_use]
    pub fn shipping(&self) -> &ShippingService {
        &self.inner.shipping
    }
}
