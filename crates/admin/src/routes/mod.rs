//! HTTP route handlers for the admin back office.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                    - Liveness check
//!
//! # Auth
//! POST /auth/login                - Sign in (admin role required)
//! POST /auth/logout               - Sign out
//!
//! # Products (admin)
//! GET    /products                - Full catalog listing
//! POST   /products                - Create product
//! PUT    /products/{id}           - Update product
//! DELETE /products/{id}           - Delete product
//!
//! # Orders (admin)
//! GET  /orders                    - All orders, optional ?status=
//! GET  /orders/recent             - Most recent orders, ?limit=
//! GET  /orders/{id}               - Order detail
//! POST /orders/{id}/status        - Lifecycle transition (+ tracking)
//!
//! # Payment methods (admin)
//! GET  /payment-methods           - List (seeds defaults when empty)
//! PUT  /payment-methods/{id}      - Merge-update a method
//! POST /payment-methods/{id}/toggle - Flip enabled
//!
//! # Metrics (admin)
//! GET  /metrics                   - Sales dashboard aggregates
//!
//! # Admin management
//! POST /admins                    - Grant the admin role by email
//! ```

pub mod admins;
pub mod auth;
pub mod orders;
pub mod payments;
pub mod products;

use axum::extract::State;
use axum::{
    Json, Router,
    routing::{get, post, put},
};
use tracing::instrument;

use pampa_core::order::Order;
use pampa_core::store::{DocumentStore, Query, collections};

use crate::error::Result;
use crate::metrics::{SalesMetrics, compute_metrics};
use crate::middleware::RequireAdmin;
use crate::state::AppState;

/// Create the admin router.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/auth/login", post(auth::login))
        .route("/auth/logout", post(auth::logout))
        .route("/products", get(products::list).post(products::create))
        .route(
            "/products/{id}",
            put(products::update).delete(products::delete),
        )
        .route("/orders", get(orders::list))
        .route("/orders/recent", get(orders::recent))
        .route("/orders/{id}", get(orders::show))
        .route("/orders/{id}/status", post(orders::update_status))
        .route("/payment-methods", get(payments::list))
        .route("/payment-methods/{id}", put(payments::update))
        .route("/payment-methods/{id}/toggle", post(payments::toggle))
        .route("/metrics", get(metrics))
        .route("/admins", post(admins::grant))
}

/// Sales dashboard aggregates.
#[instrument(skip(state))]
pub async fn metrics(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
) -> Result<Json<SalesMetrics>> {
    let product_count = state
        .store()
        .query(collections::PRODUCTS, Query::new())
        .await?
        .len();

    let orders: Vec<Order> = state
        .store()
        .query(collections::ORDERS, Query::new())
        .await?
        .into_iter()
        .filter_map(|stored| match stored.decode::<Order>() {
            Ok(order) => Some(order.doc),
            Err(e) => {
                tracing::warn!("skipping malformed order document: {e}");
                None
            }
        })
        .collect();

    Ok(Json(compute_metrics(&orders, product_count)))
}
