//! Checkout route handlers.
//!
//! Two steps, mirroring the two-step checkout UI: quote (validate the
//! address, price the shipment) and place (assemble and persist the
//! order). Guests can check out; signed-in users get their identity
//! attached so the order shows up in their history.

use axum::{Json, extract::State};
use serde::Deserialize;
use serde_json::{Value, json};
use tower_sessions::Session;
use tracing::instrument;

use pampa_core::address::Address;
use pampa_core::order::Customer;
use pampa_core::types::{Email, PaymentMethodId};

use crate::error::{AppError, Result};
use crate::models::session_keys;
use crate::routes::auth::current_user;
use crate::routes::cart::load_cart;
use crate::services::checkout::{self, CheckoutQuote};
use crate::state::AppState;

/// Fallback identity for guest checkout, matching the storefront's
/// "Invitado" presentation.
const GUEST_NAME: &str = "Invitado";
const GUEST_EMAIL: &str = "invitado@pampaimportados.com.ar";

/// Quote request: the shipping address for the current cart.
#[derive(Debug, Deserialize)]
pub struct QuoteRequest {
    pub address: Address,
}

/// Place request: address plus optional payment method and guest
/// contact details.
#[derive(Debug, Deserialize)]
pub struct PlaceRequest {
    pub address: Address,
    pub payment_method: Option<String>,
    /// Guest contact name, ignored for signed-in users.
    pub name: Option<String>,
    /// Guest contact email, ignored for signed-in users.
    pub email: Option<String>,
}

/// Validate the address and quote shipping for the session cart.
#[instrument(skip(state, session, request))]
pub async fn quote(
    State(state): State<AppState>,
    session: Session,
    Json(request): Json<QuoteRequest>,
) -> Result<Json<CheckoutQuote>> {
    let cart = load_cart(&session).await;
    let quote = checkout::quote(&state, &cart, &request.address).await?;
    Ok(Json(quote))
}

/// Place the order for the session cart and clear the cart.
#[instrument(skip(state, session, request))]
pub async fn place(
    State(state): State<AppState>,
    session: Session,
    Json(request): Json<PlaceRequest>,
) -> Result<Json<Value>> {
    let cart = load_cart(&session).await;

    let customer = match current_user(&session).await {
        Some(user) => Customer {
            name: if user.display_name.is_empty() {
                GUEST_NAME.to_owned()
            } else {
                user.display_name
            },
            email: user.email,
            user_id: Some(user.id),
        },
        None => {
            let email = match request.email.as_deref().filter(|e| !e.trim().is_empty()) {
                Some(raw) => Email::parse(raw)
                    .map_err(|e| AppError::BadRequest(format!("email inválido: {e}")))?,
                None => Email::parse(GUEST_EMAIL)
                    .map_err(|e| AppError::Internal(e.to_string()))?,
            };
            Customer {
                name: request
                    .name
                    .filter(|n| !n.trim().is_empty())
                    .unwrap_or_else(|| GUEST_NAME.to_owned()),
                email,
                user_id: None,
            }
        }
    };

    let payment_method = request.payment_method.map(PaymentMethodId::new);
    let (order_id, total) =
        checkout::place_order(&state, &cart, request.address, customer, payment_method).await?;

    // The cart is spent once the order exists
    let _spent = session
        .remove::<crate::models::CartState>(session_keys::CART)
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?;

    Ok(Json(json!({ "order_id": order_id, "total": total })))
}
