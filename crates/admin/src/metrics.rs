//! Sales metrics aggregation.
//!
//! Pure computation over a snapshot of the orders collection: revenue,
//! order counts, average ticket, and distributions by status, payment
//! method and product. The handler fetches the documents; this module
//! only folds.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::Serialize;

use pampa_core::order::Order;

/// The metrics dashboard payload.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SalesMetrics {
    pub total_products: usize,
    pub total_orders: usize,
    /// Sum of order totals (shipping included), every status counted.
    pub total_revenue: Decimal,
    /// `total_revenue / total_orders`, zero with no orders.
    pub avg_order_value: Decimal,
    pub orders_by_status: BTreeMap<String, usize>,
    pub orders_by_payment: BTreeMap<String, usize>,
    /// Units sold per product id, across all orders.
    pub units_by_product: BTreeMap<String, u64>,
}

/// Fold the order snapshot into dashboard metrics.
#[must_use]
pub fn compute_metrics(orders: &[Order], total_products: usize) -> SalesMetrics {
    let total_orders = orders.len();
    let total_revenue: Decimal = orders.iter().map(|o| o.total).sum();
    let avg_order_value = if total_orders == 0 {
        Decimal::ZERO
    } else {
        total_revenue / Decimal::from(total_orders)
    };

    let mut orders_by_status: BTreeMap<String, usize> = BTreeMap::new();
    let mut orders_by_payment: BTreeMap<String, usize> = BTreeMap::new();
    let mut units_by_product: BTreeMap<String, u64> = BTreeMap::new();

    for order in orders {
        *orders_by_status
            .entry(order.status.to_string())
            .or_default() += 1;
        *orders_by_payment
            .entry(order.payment_method.as_str().to_owned())
            .or_default() += 1;
        for item in &order.items {
            *units_by_product
                .entry(item.product_id.as_str().to_owned())
                .or_default() += u64::from(item.quantity);
        }
    }

    SalesMetrics {
        total_products,
        total_orders,
        total_revenue,
        avg_order_value,
        orders_by_status,
        orders_by_payment,
        units_by_product,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::Utc;
    use pampa_core::address::Address;
    use pampa_core::order::{Customer, LineItem};
    use pampa_core::shipping::{DeliveryWindow, ShippingQuote};
    use pampa_core::types::{Email, OrderStatus, PaymentMethodId, ProductId, pesos};

    fn order(total: i64, status: OrderStatus, method: &str, items: Vec<(&str, u32)>) -> Order {
        let items: Vec<LineItem> = items
            .into_iter()
            .map(|(id, quantity)| LineItem {
                product_id: ProductId::new(id),
                name: format!("Producto {id}"),
                unit_price: pesos(10),
                quantity,
            })
            .collect();
        Order {
            customer: Customer {
                name: "Ana".to_owned(),
                email: Email::parse("ana@example.com").unwrap(),
                user_id: None,
            },
            items,
            subtotal: pesos(total),
            shipping: ShippingQuote {
                zone_id: "caba".into(),
                zone_name: "CABA".to_owned(),
                base_cost: pesos(0),
                additional_cost: pesos(0),
                total_cost: pesos(0),
                estimated_delivery: DeliveryWindow::Near,
            },
            shipping_address: Address {
                street: "Calle".to_owned(),
                street_number: "1".to_owned(),
                between_streets: None,
                city: "CABA".to_owned(),
                province: "CABA".to_owned(),
                postal_code: "1000".to_owned(),
            },
            total: pesos(total),
            payment_method: PaymentMethodId::new(method),
            status,
            tracking_number: None,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_empty_snapshot() {
        let metrics = compute_metrics(&[], 7);
        assert_eq!(metrics.total_products, 7);
        assert_eq!(metrics.total_orders, 0);
        assert_eq!(metrics.total_revenue, Decimal::ZERO);
        assert_eq!(metrics.avg_order_value, Decimal::ZERO);
        assert!(metrics.orders_by_status.is_empty());
    }

    #[test]
    fn test_revenue_and_average() {
        let orders = vec![
            order(100, OrderStatus::Pending, "transfer", vec![("p1", 2)]),
            order(300, OrderStatus::Shipped, "transfer", vec![("p1", 1), ("p2", 3)]),
        ];
        let metrics = compute_metrics(&orders, 2);
        assert_eq!(metrics.total_revenue, pesos(400));
        assert_eq!(metrics.avg_order_value, pesos(200));
    }

    #[test]
    fn test_distributions() {
        let orders = vec![
            order(100, OrderStatus::Pending, "transfer", vec![("p1", 2)]),
            order(200, OrderStatus::Pending, "mercadopago", vec![("p2", 1)]),
            order(300, OrderStatus::Delivered, "transfer", vec![("p1", 4)]),
        ];
        let metrics = compute_metrics(&orders, 2);

        assert_eq!(metrics.orders_by_status.get("pending"), Some(&2));
        assert_eq!(metrics.orders_by_status.get("delivered"), Some(&1));
        assert_eq!(metrics.orders_by_payment.get("transfer"), Some(&2));
        assert_eq!(metrics.orders_by_payment.get("mercadopago"), Some(&1));
        assert_eq!(metrics.units_by_product.get("p1"), Some(&6));
        assert_eq!(metrics.units_by_product.get("p2"), Some(&1));
    }
}
