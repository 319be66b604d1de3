//! Shipping zone definitions.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::types::{ZoneId, pesos};

/// Reserved id of the fallback zone that matches any unrecognized
/// postal code. Exactly one zone in a valid table carries it, and it is
/// the only zone with an empty prefix list.
pub const FALLBACK_ZONE_ID: &str = "otros";

/// A shipping zone: a named region with a postal-code prefix set and a
/// cost formula.
///
/// A postal code belongs to the zone if it starts with any of the
/// prefixes. Matching is plain string-prefix comparison, so the table
/// must be curated so prefixes of different zones never overlap.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShippingZone {
    pub id: ZoneId,
    /// Human-readable label (Spanish).
    pub name: String,
    /// Ordered prefix set; empty only for the fallback zone.
    pub postal_code_prefixes: Vec<String>,
    /// Cost of the first kilogram.
    pub base_cost: Decimal,
    /// Surcharge per kilogram beyond the first.
    pub additional_cost_per_kg: Decimal,
}

impl ShippingZone {
    /// Whether this is the designated catch-all zone.
    #[must_use]
    pub fn is_fallback(&self) -> bool {
        self.id.as_str() == FALLBACK_ZONE_ID
    }

    /// Whether `postal_code` starts with any of this zone's prefixes.
    #[must_use]
    pub fn matches(&self, postal_code: &str) -> bool {
        self.postal_code_prefixes
            .iter()
            .any(|prefix| postal_code.starts_with(prefix.as_str()))
    }
}

fn zone(
    id: &str,
    name: &str,
    prefixes: &[&str],
    base_cost: Decimal,
    additional_cost_per_kg: Decimal,
) -> ShippingZone {
    ShippingZone {
        id: ZoneId::new(id),
        name: name.to_owned(),
        postal_code_prefixes: prefixes.iter().map(|p| (*p).to_owned()).collect(),
        base_cost,
        additional_cost_per_kg,
    }
}

/// The default Argentine zone table.
///
/// Prefixes are curated to be disjoint: every 4-5 digit code matches at
/// most one zone, so table order never decides a resolution. Codes with
/// no match (e.g. `9xxx`, Patagonia) fall through to `otros`.
#[must_use]
pub fn default_zones() -> Vec<ShippingZone> {
    vec![
        zone(
            "caba",
            "Ciudad Autónoma de Buenos Aires",
            &["10", "11", "12", "13"],
            pesos(500),
            pesos(150),
        ),
        zone(
            "gba_norte",
            "Gran Buenos Aires Norte",
            &["16"],
            pesos(800),
            pesos(200),
        ),
        zone(
            "gba_sur",
            "Gran Buenos Aires Sur",
            &["18", "19"],
            pesos(800),
            pesos(200),
        ),
        zone(
            "gba_oeste",
            "Gran Buenos Aires Oeste",
            &["14", "17"],
            pesos(800),
            pesos(200),
        ),
        zone(
            "interior_buenos_aires",
            "Interior Buenos Aires",
            &["6", "7", "8"],
            pesos(1200),
            pesos(300),
        ),
        zone(
            "cordoba",
            "Córdoba",
            &["50", "51", "52", "53", "54"],
            pesos(1500),
            pesos(350),
        ),
        zone(
            "santa_fe",
            "Santa Fe",
            &["2", "3"],
            pesos(1400),
            pesos(330),
        ),
        zone(
            "mendoza",
            "Mendoza",
            &["55", "56", "57", "58", "59"],
            pesos(1600),
            pesos(380),
        ),
        zone(
            "tucuman",
            "Tucumán",
            &["4"],
            pesos(1800),
            pesos(420),
        ),
        zone("otros", "Otras Provincias", &[], pesos(2000), pesos(500)),
    ]
}

/// Table curation check: exactly one fallback zone, with an empty prefix
/// set, and no zone other than the fallback without prefixes.
///
/// Backends run this when seeding; it is advisory, not enforced at
/// resolution time.
#[must_use]
pub fn table_is_well_formed(zones: &[ShippingZone]) -> bool {
    let fallbacks = zones.iter().filter(|z| z.is_fallback()).count();
    let empty_prefix_sets = zones
        .iter()
        .filter(|z| z.postal_code_prefixes.is_empty())
        .count();
    fallbacks == 1
        && empty_prefix_sets == 1
        && zones
            .iter()
            .find(|z| z.is_fallback())
            .is_some_and(|z| z.postal_code_prefixes.is_empty())
}
