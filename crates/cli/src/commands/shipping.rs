//! Initialize the shipping zone table.

use tracing::{info, warn};

use pampa_core::shipping::{default_zones, table_is_well_formed};
use pampa_core::store::{DocumentStore, Query, collections};

/// Write the default zone table.
///
/// Refuses to touch an already-populated collection unless `force` is
/// given; the storefront treats the table as curated configuration.
///
/// # Errors
///
/// Returns an error if the backend cannot be reached or a write fails.
pub async fn init(force: bool) -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    let store = pampa_backend::store_from_env().await?;

    let existing = store
        .query(collections::SHIPPING_ZONES, Query::new())
        .await?;
    if !existing.is_empty() && !force {
        warn!(
            count = existing.len(),
            "shipping_zones already populated; use --force to overwrite"
        );
        return Ok(());
    }

    let zones = default_zones();
    debug_assert!(table_is_well_formed(&zones));

    for zone in &zones {
        store
            .upsert(
                collections::SHIPPING_ZONES,
                zone.id.as_str(),
                serde_json::to_value(zone)?,
            )
            .await?;
        info!(zone = %zone.id, name = %zone.name, "Zone written");
    }

    info!(count = zones.len(), "Shipping zones initialized");
    Ok(())
}
