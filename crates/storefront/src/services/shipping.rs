//! Shipping quotes over the store-supplied zone table.
//!
//! The zone table lives in the `shipping_zones` collection and is
//! treated as static configuration: loaded through a short-TTL moka
//! cache, seeded with the default Argentine table the first time the
//! collection turns up empty. When the store cannot produce a usable
//! table the service degrades to [`ShippingQuote::unavailable`] instead
//! of failing the request - checkout rejects that quote at placement.

use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache;
use rust_decimal::Decimal;
use tracing::instrument;

use pampa_core::shipping::{
    ShippingQuote, ShippingZone, calculate_shipping_cost, default_zones, resolve_zone,
    table_is_well_formed,
};
use pampa_core::store::{DocumentStore, Query, StoreError, collections};

/// Zone-table cache TTL. Refreshing is cheap and admin edits to the
/// table should show up within minutes.
const ZONE_CACHE_TTL: Duration = Duration::from_secs(300);

/// Shipping quote service; owns the zone-table cache.
#[derive(Clone)]
pub struct ShippingService {
    store: Arc<dyn DocumentStore>,
    zones: Cache<(), Arc<Vec<ShippingZone>>>,
}

impl ShippingService {
    #[must_use]
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self {
            store,
            zones: Cache::builder()
                .max_capacity(1)
                .time_to_live(ZONE_CACHE_TTL)
                .build(),
        }
    }

    /// The current zone table, from cache or the store.
    ///
    /// An empty collection is seeded with [`default_zones`] so a fresh
    /// deployment quotes correctly without manual setup.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the table cannot be read or seeded.
    pub async fn zone_table(&self) -> Result<Arc<Vec<ShippingZone>>, StoreError> {
        self.zones
            .try_get_with((), self.load_zone_table())
            .await
            .map_err(|e: Arc<StoreError>| StoreError::Backend(e.to_string()))
    }

    async fn load_zone_table(&self) -> Result<Arc<Vec<ShippingZone>>, StoreError> {
        let raw = self
            .store
            .query(collections::SHIPPING_ZONES, Query::new())
            .await?;

        if raw.is_empty() {
            tracing::info!("shipping_zones collection empty, seeding defaults");
            let zones = default_zones();
            seed_zones(self.store.as_ref(), &zones).await?;
            return Ok(Arc::new(zones));
        }

        let zones: Vec<ShippingZone> = raw
            .into_iter()
            .filter_map(|stored| match stored.decode::<ShippingZone>() {
                Ok(zone) => Some(zone.doc),
                Err(e) => {
                    tracing::warn!("skipping malformed zone document: {e}");
                    None
                }
            })
            .collect();

        if !table_is_well_formed(&zones) {
            tracing::warn!("zone table is malformed (fallback invariant violated)");
        }

        Ok(Arc::new(zones))
    }

    /// Quote shipping for a postal code and package weight.
    ///
    /// Never fails: when the zone table is unavailable or unusable, the
    /// degraded sentinel quote is returned and the caller decides
    /// whether to block checkout. Zero-cost quotes with the sentinel
    /// label mean "calculation unavailable", not free shipping.
    #[instrument(skip(self))]
    pub async fn quote(&self, postal_code: &str, weight_kg: Decimal) -> ShippingQuote {
        let zones = match self.zone_table().await {
            Ok(zones) => zones,
            Err(e) => {
                tracing::error!("zone table unavailable: {e}");
                return ShippingQuote::unavailable();
            }
        };

        match resolve_zone(postal_code, &zones) {
            Some(zone) => calculate_shipping_cost(zone, weight_kg),
            None => {
                tracing::error!("zone table has no fallback zone");
                ShippingQuote::unavailable()
            }
        }
    }
}

/// Write a zone table into the store, one document per zone, keyed by
/// zone id.
///
/// # Errors
///
/// Returns [`StoreError`] if any write fails.
pub async fn seed_zones(
    store: &dyn DocumentStore,
    zones: &[ShippingZone],
) -> Result<(), StoreError> {
    for zone in zones {
        let doc = serde_json::to_value(zone)
            .map_err(|e| StoreError::Corrupt(format!("zone {}: {e}", zone.id)))?;
        store
            .upsert(collections::SHIPPING_ZONES, zone.id.as_str(), doc)
            .await?;
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use pampa_backend::MemoryStore;
    use pampa_core::store::{Document, Stored};
    use pampa_core::types::pesos;
    use rust_decimal_macros::dec;

    fn service(store: Arc<dyn DocumentStore>) -> ShippingService {
        ShippingService::new(store)
    }

    #[tokio::test]
    async fn test_empty_collection_is_seeded_with_defaults() {
        let store = Arc::new(MemoryStore::new());
        let shipping = service(store.clone());

        let zones = shipping.zone_table().await.unwrap();
        assert_eq!(zones.len(), default_zones().len());

        // The seed is persisted, not just cached
        let stored = store
            .query(collections::SHIPPING_ZONES, Query::new())
            .await
            .unwrap();
        assert_eq!(stored.len(), zones.len());
    }

    #[tokio::test]
    async fn test_quote_for_matched_zone() {
        let shipping = service(Arc::new(MemoryStore::new()));
        let quote = shipping.quote("1005", dec!(1)).await;
        assert_eq!(quote.zone_id.as_str(), "caba");
        assert_eq!(quote.total_cost, pesos(500));
        assert!(!quote.is_degraded());
    }

    #[tokio::test]
    async fn test_quote_for_unmatched_code_uses_fallback() {
        let shipping = service(Arc::new(MemoryStore::new()));
        let quote = shipping.quote("9999", dec!(3)).await;
        assert_eq!(quote.zone_id.as_str(), "otros");
        assert_eq!(quote.total_cost, pesos(2000) + pesos(500) * dec!(2));
    }

    /// A store whose every operation fails.
    struct BrokenStore;

    #[async_trait]
    impl DocumentStore for BrokenStore {
        async fn insert(&self, _: &str, _: Document) -> Result<String, StoreError> {
            Err(StoreError::Backend("down".to_owned()))
        }
        async fn upsert(&self, _: &str, _: &str, _: Document) -> Result<(), StoreError> {
            Err(StoreError::Backend("down".to_owned()))
        }
        async fn get(&self, _: &str, _: &str) -> Result<Option<Document>, StoreError> {
            Err(StoreError::Backend("down".to_owned()))
        }
        async fn update(&self, _: &str, _: &str, _: Document) -> Result<(), StoreError> {
            Err(StoreError::Backend("down".to_owned()))
        }
        async fn delete(&self, _: &str, _: &str) -> Result<(), StoreError> {
            Err(StoreError::Backend("down".to_owned()))
        }
        async fn query(&self, _: &str, _: Query) -> Result<Vec<Stored<Document>>, StoreError> {
            Err(StoreError::Backend("down".to_owned()))
        }
    }

    #[tokio::test]
    async fn test_store_failure_degrades_to_unavailable_quote() {
        let shipping = service(Arc::new(BrokenStore));
        let quote = shipping.quote("1005", dec!(2)).await;
        assert!(quote.is_degraded());
        assert_eq!(quote.total_cost, Decimal::ZERO);
    }

    #[tokio::test]
    async fn test_quote_is_idempotent_across_calls() {
        let shipping = service(Arc::new(MemoryStore::new()));
        let a = shipping.quote("5000", dec!(2.5)).await;
        let b = shipping.quote("5000", dec!(2.5)).await;
        assert_eq!(a, b);
    }
}
