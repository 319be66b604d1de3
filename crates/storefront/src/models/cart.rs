//! Session cart state.
//!
//! The cart is an explicit state object carried through the checkout
//! flow (stored in the session, passed by value into the services), not
//! ambient global state. Each line snapshots the product's name, price
//! and weight at add-to-cart time; checkout recomputes shipping from
//! these snapshots.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use pampa_core::order::LineItem;
use pampa_core::types::ProductId;

/// One cart line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartItem {
    pub product_id: ProductId,
    pub name: String,
    pub unit_price: Decimal,
    pub weight_kg: Decimal,
    pub quantity: u32,
}

/// The session cart.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CartState {
    pub items: Vec<CartItem>,
}

impl CartState {
    /// Add `quantity` units of a product, merging with an existing line.
    pub fn add(&mut self, item: CartItem) {
        if let Some(existing) = self
            .items
            .iter_mut()
            .find(|i| i.product_id == item.product_id)
        {
            existing.quantity = existing.quantity.saturating_add(item.quantity);
        } else {
            self.items.push(item);
        }
    }

    /// Set a line's quantity; zero removes the line.
    pub fn set_quantity(&mut self, product_id: &ProductId, quantity: u32) {
        if quantity == 0 {
            self.remove(product_id);
        } else if let Some(item) = self.items.iter_mut().find(|i| &i.product_id == product_id) {
            item.quantity = quantity;
        }
    }

    /// Remove a line entirely.
    pub fn remove(&mut self, product_id: &ProductId) {
        self.items.retain(|i| &i.product_id != product_id);
    }

    /// Total number of units across all lines.
    #[must_use]
    pub fn item_count(&self) -> u32 {
        self.items.iter().map(|i| i.quantity).sum()
    }

    /// Sum of `unit_price * quantity` across all lines.
    #[must_use]
    pub fn subtotal(&self) -> Decimal {
        self.items
            .iter()
            .map(|i| i.unit_price * Decimal::from(i.quantity))
            .sum()
    }

    /// Total package weight. Shipping charges at least one kilogram, so
    /// the floor is 1 kg for a non-empty cart.
    #[must_use]
    pub fn shipping_weight_kg(&self) -> Decimal {
        let weight: Decimal = self
            .items
            .iter()
            .map(|i| i.weight_kg * Decimal::from(i.quantity))
            .sum();
        weight.max(Decimal::ONE)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Freeze the cart into order line items.
    #[must_use]
    pub fn to_line_items(&self) -> Vec<LineItem> {
        self.items
            .iter()
            .map(|i| LineItem {
                product_id: i.product_id.clone(),
                name: i.name.clone(),
                unit_price: i.unit_price,
                quantity: i.quantity,
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pampa_core::types::pesos;
    use rust_decimal_macros::dec;

    fn item(id: &str, price: i64, weight: Decimal, quantity: u32) -> CartItem {
        CartItem {
            product_id: ProductId::new(id),
            name: format!("Producto {id}"),
            unit_price: pesos(price),
            weight_kg: weight,
            quantity,
        }
    }

    #[test]
    fn test_add_merges_same_product() {
        let mut cart = CartState::default();
        cart.add(item("p1", 100, dec!(0.5), 1));
        cart.add(item("p1", 100, dec!(0.5), 2));
        assert_eq!(cart.items.len(), 1);
        assert_eq!(cart.item_count(), 3);
    }

    #[test]
    fn test_subtotal() {
        let mut cart = CartState::default();
        cart.add(item("p1", 100, dec!(1), 2));
        cart.add(item("p2", 50, dec!(1), 1));
        assert_eq!(cart.subtotal(), pesos(250));
    }

    #[test]
    fn test_set_quantity_zero_removes() {
        let mut cart = CartState::default();
        cart.add(item("p1", 100, dec!(1), 2));
        cart.set_quantity(&ProductId::new("p1"), 0);
        assert!(cart.is_empty());
    }

    #[test]
    fn test_shipping_weight_has_one_kg_floor() {
        let mut cart = CartState::default();
        cart.add(item("p1", 100, dec!(0.2), 2));
        assert_eq!(cart.shipping_weight_kg(), Decimal::ONE);

        cart.add(item("p2", 50, dec!(1.5), 2));
        assert_eq!(cart.shipping_weight_kg(), dec!(3.4));
    }

    #[test]
    fn test_to_line_items_snapshots_prices() {
        let mut cart = CartState::default();
        cart.add(item("p1", 100, dec!(1), 2));
        let lines = cart.to_line_items();
        assert_eq!(lines.len(), 1);
        assert_eq!(lines.first().map(|l| l.line_total()), Some(pesos(200)));
    }
}
