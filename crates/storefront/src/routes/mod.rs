//! HTTP route handlers for the storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                 - Liveness check
//! GET  /health/ready           - Readiness check (store reachable)
//!
//! # Catalog
//! GET  /products               - Product listing (category/search/sort)
//! GET  /products/{id}          - Product detail
//! GET  /products/{id}/similar  - Same-category, in-stock shelf
//! GET  /featured               - Featured products for the home page
//!
//! # Cart (session-backed)
//! GET  /cart                   - Cart contents and subtotal
//! POST /cart/add               - Add a product
//! POST /cart/update            - Change a line's quantity (0 removes)
//! POST /cart/remove            - Remove a line
//! GET  /cart/count             - Unit count badge
//!
//! # Checkout
//! POST /checkout/quote         - Validate address, quote shipping
//! POST /checkout/place         - Place the order
//!
//! # Orders
//! GET  /orders/{id}            - Order confirmation view
//!
//! # Auth
//! POST /auth/register          - Create account
//! POST /auth/login             - Sign in
//! POST /auth/logout            - Sign out
//!
//! # Account (requires auth)
//! GET  /account/profile        - Profile with saved address
//! PUT  /account/profile        - Update profile / saved address
//! GET  /account/orders         - Order history, newest first
//! ```

pub mod account;
pub mod auth;
pub mod cart;
pub mod checkout;
pub mod orders;
pub mod products;

use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

/// Create the storefront router.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/products", get(products::list))
        .route("/products/{id}", get(products::detail))
        .route("/products/{id}/similar", get(products::similar))
        .route("/featured", get(products::featured))
        .route("/cart", get(cart::show))
        .route("/cart/add", post(cart::add))
        .route("/cart/update", post(cart::update))
        .route("/cart/remove", post(cart::remove))
        .route("/cart/count", get(cart::count))
        .route("/checkout/quote", post(checkout::quote))
        .route("/checkout/place", post(checkout::place))
        .route("/orders/{id}", get(orders::show))
        .route("/auth/register", post(auth::register))
        .route("/auth/login", post(auth::login))
        .route("/auth/logout", post(auth::logout))
        .route("/account/profile", get(account::profile).put(account::update_profile))
        .route("/account/orders", get(account::orders))
}
