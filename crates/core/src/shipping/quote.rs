//! Shipping quotes and delivery estimates.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::types::ZoneId;

/// Zone label used by the degraded quote when no zone table is
/// available. Callers must treat quotes carrying it as "calculation
/// unavailable", never as free shipping.
pub const UNAVAILABLE_ZONE_NAME: &str = "Desconocida";

/// Estimated delivery window, bucketed by zone identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeliveryWindow {
    /// CABA / Gran Buenos Aires / interior of Buenos Aires province.
    Near,
    /// Mid-distance named provinces (Córdoba, Santa Fe, Mendoza, Tucumán).
    MidDistance,
    /// Fallback zone: everything else.
    Extended,
    /// No estimate possible (degraded quote).
    Unavailable,
}

impl DeliveryWindow {
    /// The buckets keyed by zone id membership.
    #[must_use]
    pub fn for_zone(zone_id: &ZoneId) -> Self {
        match zone_id.as_str() {
            "cordoba" | "santa_fe" | "mendoza" | "tucuman" => Self::MidDistance,
            "otros" => Self::Extended,
            _ => Self::Near,
        }
    }

    /// Spanish estimate string shown at checkout.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Near => "3-5 días hábiles",
            Self::MidDistance => "5-7 días hábiles",
            Self::Extended => "7-10 días hábiles",
            Self::Unavailable => "Contactar soporte",
        }
    }
}

impl std::fmt::Display for DeliveryWindow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// The computed shipping cost and delivery estimate for a zone and
/// weight. Embedded into the order at placement time; never stored on
/// its own.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShippingQuote {
    pub zone_id: ZoneId,
    pub zone_name: String,
    /// Cost of the first kilogram.
    pub base_cost: Decimal,
    /// Surcharge for weight beyond the first kilogram.
    pub additional_cost: Decimal,
    /// `base_cost + additional_cost`, always `>= base_cost`.
    pub total_cost: Decimal,
    pub estimated_delivery: DeliveryWindow,
}

impl ShippingQuote {
    /// The degraded quote returned when the zone table cannot be
    /// obtained: zero costs, sentinel label, "contact support" estimate.
    ///
    /// This is a deliberate fallback policy rather than an error so the
    /// caller can decide whether to block checkout; order placement
    /// always rejects it.
    #[must_use]
    pub fn unavailable() -> Self {
        Self {
            zone_id: ZoneId::new("desconocida"),
            zone_name: UNAVAILABLE_ZONE_NAME.to_owned(),
            base_cost: Decimal::ZERO,
            additional_cost: Decimal::ZERO,
            total_cost: Decimal::ZERO,
            estimated_delivery: DeliveryWindow::Unavailable,
        }
    }

    /// Whether this is the sentinel "calculation unavailable" quote.
    #[must_use]
    pub fn is_degraded(&self) -> bool {
        self.estimated_delivery == DeliveryWindow::Unavailable
    }
}
