//! Admin order management over the in-memory backend: lifecycle
//! transitions, tracking numbers, metrics.
//!
//! Admin handlers are plain async functions, so they are exercised
//! directly with constructed extractors instead of going through HTTP.

#![allow(clippy::unwrap_used)]

use axum::Json;
use axum::extract::{Path, State};

use pampa_admin::error::AppError;
use pampa_admin::middleware::{CurrentAdmin, RequireAdmin};
use pampa_admin::routes::orders::{StatusForm, update_status};
use pampa_core::address::Address;
use pampa_core::order::{Customer, Order};
use pampa_core::store::{AuthProvider, DocumentStore, collections};
use pampa_core::types::{Email, OrderStatus, UserId, pesos};
use pampa_integration_tests::TestHarness;
use pampa_storefront::models::{CartItem, CartState};
use pampa_storefront::services::checkout;
use rust_decimal_macros::dec;

fn address() -> Address {
    Address {
        street: "San Martín".to_owned(),
        street_number: "450".to_owned(),
        between_streets: None,
        city: "Córdoba".to_owned(),
        province: "Córdoba".to_owned(),
        postal_code: "5000".to_owned(),
    }
}

/// Register an account, flip its role to admin, and return the
/// identity the handlers expect.
async fn make_admin(harness: &TestHarness, email: &str) -> CurrentAdmin {
    let user = harness
        .storefront
        .auth()
        .register(&Email::parse(email).unwrap(), "secreta123", "Admin")
        .await
        .unwrap();
    harness
        .store
        .update(
            collections::USERS,
            user.id.as_str(),
            serde_json::json!({ "role": "admin" }),
        )
        .await
        .unwrap();
    CurrentAdmin {
        id: user.id,
        email: user.email,
        display_name: user.display_name,
    }
}

async fn place_test_order(harness: &TestHarness) -> String {
    let product = harness
        .seed_product("Termo Stanley Classic 1L", "termos", pesos(100), 10, dec!(1))
        .await
        .unwrap();
    let mut cart = CartState::default();
    cart.add(CartItem {
        product_id: product.into(),
        name: "Termo Stanley Classic 1L".to_owned(),
        unit_price: pesos(100),
        weight_kg: dec!(1),
        quantity: 1,
    });
    let customer = Customer {
        name: "Ana".to_owned(),
        email: Email::parse("ana@example.com").unwrap(),
        user_id: Some(UserId::new("u1")),
    };
    let (order_id, _) = checkout::place_order(&harness.storefront, &cart, address(), customer, None)
        .await
        .unwrap();
    order_id.into_inner()
}

async fn order_status(harness: &TestHarness, id: &str) -> Order {
    let doc = harness
        .store
        .get(collections::ORDERS, id)
        .await
        .unwrap()
        .unwrap();
    serde_json::from_value(doc).unwrap()
}

#[tokio::test]
async fn test_ship_then_deliver() {
    let harness = TestHarness::new();
    let admin = make_admin(&harness, "admin@pampaimportados.com.ar").await;
    let order_id = place_test_order(&harness).await;

    update_status(
        RequireAdmin(admin.clone()),
        State(harness.admin.clone()),
        Path(order_id.clone()),
        Json(StatusForm {
            status: OrderStatus::Shipped,
            tracking_number: Some("CA123456789AR".to_owned()),
        }),
    )
    .await
    .unwrap();

    let order = order_status(&harness, &order_id).await;
    assert_eq!(order.status, OrderStatus::Shipped);
    assert_eq!(order.tracking_number.as_deref(), Some("CA123456789AR"));

    update_status(
        RequireAdmin(admin.clone()),
        State(harness.admin.clone()),
        Path(order_id.clone()),
        Json(StatusForm {
            status: OrderStatus::Delivered,
            tracking_number: None,
        }),
    )
    .await
    .unwrap();

    let order = order_status(&harness, &order_id).await;
    assert_eq!(order.status, OrderStatus::Delivered);
    // Tracking survives later transitions
    assert_eq!(order.tracking_number.as_deref(), Some("CA123456789AR"));
}

#[tokio::test]
async fn test_illegal_transitions_rejected() {
    let harness = TestHarness::new();
    let order_id = place_test_order(&harness).await;

    // pending -> delivered skips shipping
    let admin = make_admin(&harness, "admin@pampaimportados.com.ar").await;
    let err = update_status(
        RequireAdmin(admin.clone()),
        State(harness.admin.clone()),
        Path(order_id.clone()),
        Json(StatusForm {
            status: OrderStatus::Delivered,
            tracking_number: None,
        }),
    )
    .await
    .unwrap_err();
    assert!(matches!(err, AppError::InvalidTransition { .. }));

    // cancel, then try to ship a terminal order
    update_status(
        RequireAdmin(admin.clone()),
        State(harness.admin.clone()),
        Path(order_id.clone()),
        Json(StatusForm {
            status: OrderStatus::Cancelled,
            tracking_number: None,
        }),
    )
    .await
    .unwrap();

    let err = update_status(
        RequireAdmin(admin.clone()),
        State(harness.admin.clone()),
        Path(order_id.clone()),
        Json(StatusForm {
            status: OrderStatus::Shipped,
            tracking_number: None,
        }),
    )
    .await
    .unwrap_err();
    assert!(matches!(err, AppError::InvalidTransition { .. }));

    let order = order_status(&harness, &order_id).await;
    assert_eq!(order.status, OrderStatus::Cancelled);
}

#[tokio::test]
async fn test_tracking_only_on_shipping() {
    let harness = TestHarness::new();
    let order_id = place_test_order(&harness).await;

    let admin = make_admin(&harness, "admin@pampaimportados.com.ar").await;
    let err = update_status(
        RequireAdmin(admin.clone()),
        State(harness.admin.clone()),
        Path(order_id.clone()),
        Json(StatusForm {
            status: OrderStatus::Cancelled,
            tracking_number: Some("CA123456789AR".to_owned()),
        }),
    )
    .await
    .unwrap_err();
    assert!(matches!(err, AppError::BadRequest(_)));

    // The order is untouched after the rejection
    let order = order_status(&harness, &order_id).await;
    assert_eq!(order.status, OrderStatus::Pending);
    assert!(order.tracking_number.is_none());
}

#[tokio::test]
async fn test_metrics_over_orders() {
    let harness = TestHarness::new();
    let first = place_test_order(&harness).await;
    let _second = place_test_order(&harness).await;

    let admin = make_admin(&harness, "admin@pampaimportados.com.ar").await;
    update_status(
        RequireAdmin(admin.clone()),
        State(harness.admin.clone()),
        Path(first),
        Json(StatusForm {
            status: OrderStatus::Shipped,
            tracking_number: None,
        }),
    )
    .await
    .unwrap();

    let Json(metrics) = pampa_admin::routes::metrics(
        RequireAdmin(admin.clone()),
        State(harness.admin.clone()),
    )
        .await
        .unwrap();

    assert_eq!(metrics.total_orders, 2);
    // Each order: 100 subtotal + 1500 shipping (córdoba, 1 kg -> base only)
    assert_eq!(metrics.total_revenue, pesos(2 * (100 + 1500)));
    assert_eq!(metrics.orders_by_status.get("pending"), Some(&1));
    assert_eq!(metrics.orders_by_status.get("shipped"), Some(&1));
    assert_eq!(metrics.orders_by_payment.get("transfer"), Some(&2));
}
