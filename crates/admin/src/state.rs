//! Application state shared across admin handlers.

use std::sync::Arc;

use pampa_core::store::{AuthProvider, DocumentStore};

use crate::config::AdminConfig;

/// Application state shared across all admin handlers.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: AdminConfig,
    store: Arc<dyn DocumentStore>,
    auth: Arc<dyn AuthProvider>,
}

impl AppState {
    /// Create a new application state.
    #[must_use]
    pub fn new(
        config: AdminConfig,
        store: Arc<dyn DocumentStore>,
        auth: Arc<dyn AuthProvider>,
    ) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                config,
                store,
                auth,
            }),
        }
    }

    /// Get a reference to the admin configuration.
    #[must_use]
    pub fn config(&self) -> &AdminConfig {
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
}
