//! Shared fixtures for the Pampa integration tests.
//!
//! Everything runs over the in-memory backend; both service states wrap
//! the same store so what the storefront writes, the admin sees.

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::sync::Arc;

use chrono::Utc;
use rust_decimal::Decimal;

use pampa_backend::{MemoryStore, StoreAuthProvider};
use pampa_core::catalog::Product;
use pampa_core::store::{DocumentStore, StoreError, collections};

/// One shared store with a storefront state and an admin state on top.
pub struct TestHarness {
    pub store: Arc<dyn DocumentStore>,
    pub storefront: pampa_storefront::state::AppState,
    pub admin: pampa_admin::state::AppState,
}

impl TestHarness {
    /// Build the harness over a fresh in-memory store.
    #[must_use]
    pub fn new() -> Self {
        let store: Arc<dyn DocumentStore> = Arc::new(MemoryStore::new());
        let auth = Arc::new(StoreAuthProvider::new(Arc::clone(&store)));

        let storefront_config = pampa_storefront::config::StorefrontConfig {
            host: std::net::IpAddr::from([127, 0, 0, 1]),
            port: 0,
            base_url: "http://localhost:3000".to_owned(),
            sentry_dsn: None,
            sentry_environment: None,
        };
        let storefront = pampa_storefront::state::AppState::new(
            storefront_config,
            Arc::clone(&store),
            auth.clone(),
        );

        let admin_config = pampa_admin::config::AdminConfig {
            host: std::net::IpAddr::from([127, 0, 0, 1]),
            port: 0,
            sentry_dsn: None,
            sentry_environment: None,
        };
        let admin = pampa_admin::state::AppState::new(admin_config, Arc::clone(&store), auth);

        Self {
            store,
            storefront,
            admin,
        }
    }

    /// Seed a product and return its id.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the write fails.
    pub async fn seed_product(
        &self,
        name: &str,
        category: &str,
        price: Decimal,
        stock: u32,
        weight_kg: Decimal,
    ) -> Result<String, StoreError> {
        let now = Utc::now();
        let product = Product {
            name: name.to_owned(),
            description: format!("Descripción de {name}"),
            category: category.to_owned(),
            price,
            stock,
            weight_kg,
            featured: false,
            image_url: None,
            created_at: now,
            updated_at: now,
        };
        let doc = serde_json::to_value(&product)
            .map_err(|e| StoreError::Corrupt(format!("seed product: {e}")))?;
        self.store.insert(collections::PRODUCTS, doc).await
    }
}

impl Default for TestHarness {
    fn default() -> Self {
        Self::new()
    }
}
