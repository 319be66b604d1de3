//! Shipping zone resolution and cost calculation.
//!
//! Two pure functions over a caller-supplied zone table:
//!
//! - [`resolve_zone`] maps a postal code to a zone by prefix matching,
//!   with the designated fallback zone catching everything unmatched.
//! - [`calculate_shipping_cost`] turns a zone and a package weight into
//!   a [`ShippingQuote`]: the first kilogram is covered by the base
//!   cost, every kilogram beyond it by the per-kg surcharge.
//!
//! Neither function touches the store. The table is supplied by the
//! caller (the storefront's shipping service loads and caches it), and
//! the degraded-availability path lives in [`ShippingQuote::unavailable`].

mod quote;
mod zone;

pub use quote::{DeliveryWindow, ShippingQuote, UNAVAILABLE_ZONE_NAME};
pub use zone::{FALLBACK_ZONE_ID, ShippingZone, default_zones, table_is_well_formed};

use rust_decimal::Decimal;

/// Resolve a postal code to a shipping zone.
///
/// Iterates the table in order and returns the first zone with a
/// matching prefix; if none matches, the designated fallback zone. The
/// prefix test is plain string comparison, not a numeric range check, so
/// the table is expected to carry disjoint prefixes (see
/// [`table_is_well_formed`]).
///
/// Returns `None` only when the table violates the fallback invariant
/// (no zone matched and no fallback present); callers treat that the
/// same as an unavailable table.
#[must_use]
pub fn resolve_zone<'a>(postal_code: &str, zones: &'a [ShippingZone]) -> Option<&'a ShippingZone> {
    zones
        .iter()
        .find(|z| z.matches(postal_code))
        .or_else(|| zones.iter().find(|z| z.is_fallback()))
}

/// Compute the shipping quote for a resolved zone and a weight in
/// kilograms.
///
/// The first kilogram is included in the base cost; only the excess
/// above 1 kg is charged at the zone's per-kilogram rate. Weights at or
/// below 1 kg contribute zero excess - no partial-kilogram proration,
/// and no rounding of the excess itself. Pure and idempotent: identical
/// inputs yield identical quotes.
#[must_use]
pub fn calculate_shipping_cost(zone: &ShippingZone, weight_kg: Decimal) -> ShippingQuote {
    let excess_kg = (weight_kg - Decimal::ONE).max(Decimal::ZERO);
    let additional_cost = excess_kg * zone.additional_cost_per_kg;

    ShippingQuote {
        zone_id: zone.id.clone(),
        zone_name: zone.name.clone(),
        base_cost: zone.base_cost,
        additional_cost,
        total_cost: zone.base_cost + additional_cost,
        estimated_delivery: DeliveryWindow::for_zone(&zone.id),
    }
}
