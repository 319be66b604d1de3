//! Product document shape.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

fn default_weight_kg() -> Decimal {
    Decimal::ONE
}

/// A catalog product as stored in the `products` collection.
///
/// The document id is assigned by the store and carried separately (see
/// [`crate::store::Stored`]).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub name: String,
    pub description: String,
    pub category: String,
    pub price: Decimal,
    pub stock: u32,
    /// Package weight driving the shipping calculation. Legacy documents
    /// without the field default to one kilogram.
    #[serde(default = "default_weight_kg")]
    pub weight_kg: Decimal,
    #[serde(default)]
    pub featured: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Product {
    /// Whether the product can currently be added to a cart.
    #[must_use]
    pub const fn in_stock(&self) -> bool {
        self.stock > 0
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_weight_defaults_to_one_kg() {
        let json = serde_json::json!({
            "name": "Termo Stanley Classic 1L",
            "description": "Acero inoxidable, 24h de temperatura.",
            "category": "termos",
            "price": "89.99",
            "stock": 15,
            "created_at": "2026-01-10T12:00:00Z",
            "updated_at": "2026-01-10T12:00:00Z"
        });
        let product: Product = serde_json::from_value(json).unwrap();
        assert_eq!(product.weight_kg, Decimal::ONE);
        assert!(!product.featured);
        assert!(product.in_stock());
    }

    #[test]
    fn test_out_of_stock() {
        let json = serde_json::json!({
            "name": "Drone Parrot Anafi",
            "description": "Cámara 4K HDR.",
            "category": "drones",
            "price": "1299.99",
            "stock": 0,
            "created_at": "2026-01-10T12:00:00Z",
            "updated_at": "2026-01-10T12:00:00Z"
        });
        let product: Product = serde_json::from_value(json).unwrap();
        assert!(!product.in_stock());
    }
}
