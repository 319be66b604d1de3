//! Cart route handlers.
//!
//! The cart lives in the session as an explicit [`CartState`] object;
//! every mutation loads it, applies the change and writes it back.
//! Product name, price and weight are snapshotted at add time.

use axum::{Json, extract::State};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use tower_sessions::Session;
use tracing::instrument;

use pampa_core::types::ProductId;
use rust_decimal::Decimal;

use crate::error::{AppError, Result};
use crate::models::{CartItem, CartState, session_keys};
use crate::services::catalog;
use crate::state::AppState;

/// Cart view returned to the client.
#[derive(Debug, Serialize)]
pub struct CartView {
    pub items: Vec<CartItem>,
    pub subtotal: Decimal,
    pub item_count: u32,
}

impl From<&CartState> for CartView {
    fn from(cart: &CartState) -> Self {
        Self {
            items: cart.items.clone(),
            subtotal: cart.subtotal(),
            item_count: cart.item_count(),
        }
    }
}

/// Add to cart form data.
#[derive(Debug, Deserialize)]
pub struct AddToCartForm {
    pub product_id: String,
    pub quantity: Option<u32>,
}

/// Update cart form data.
#[derive(Debug, Deserialize)]
pub struct UpdateCartForm {
    pub product_id: String,
    pub quantity: u32,
}

/// Remove from cart form data.
#[derive(Debug, Deserialize)]
pub struct RemoveFromCartForm {
    pub product_id: String,
}

/// Load the cart state from the session.
pub async fn load_cart(session: &Session) -> CartState {
    session
        .get::<CartState>(session_keys::CART)
        .await
        .ok()
        .flatten()
        .unwrap_or_default()
}

/// Write the cart state back to the session.
pub async fn save_cart(session: &Session, cart: &CartState) -> Result<()> {
    session
        .insert(session_keys::CART, cart)
        .await
        .map_err(|e| AppError::Internal(e.to_string()))
}

/// Cart contents and subtotal.
#[instrument(skip(session))]
pub async fn show(session: Session) -> Result<Json<CartView>> {
    let cart = load_cart(&session).await;
    Ok(Json(CartView::from(&cart)))
}

/// Add a product to the cart.
///
/// Validates that the product exists and has stock, then snapshots its
/// name, price and weight into the cart line.
#[instrument(skip(state, session))]
pub async fn add(
    State(state): State<AppState>,
    session: Session,
    Json(form): Json<AddToCartForm>,
) -> Result<Json<CartView>> {
    let product_id = ProductId::new(&form.product_id);
    let product = catalog::get_product(state.store().as_ref(), &product_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("producto {}", form.product_id)))?;

    if !product.doc.in_stock() {
        return Err(AppError::BadRequest("producto sin stock".to_owned()));
    }

    let mut cart = load_cart(&session).await;
    cart.add(CartItem {
        product_id,
        name: product.doc.name,
        unit_price: product.doc.price,
        weight_kg: product.doc.weight_kg,
        quantity: form.quantity.unwrap_or(1).max(1),
    });
    save_cart(&session, &cart).await?;

    Ok(Json(CartView::from(&cart)))
}

/// Change a line's quantity; zero removes the line.
#[instrument(skip(session))]
pub async fn update(
    session: Session,
    Json(form): Json<UpdateCartForm>,
) -> Result<Json<CartView>> {
    let mut cart = load_cart(&session).await;
    cart.set_quantity(&ProductId::new(&form.product_id), form.quantity);
    save_cart(&session, &cart).await?;
    Ok(Json(CartView::from(&cart)))
}

/// Remove a line from the cart.
#[instrument(skip(session))]
pub async fn remove(
    session: Session,
    Json(form): Json<RemoveFromCartForm>,
) -> Result<Json<CartView>> {
    let mut cart = load_cart(&session).await;
    cart.remove(&ProductId::new(&form.product_id));
    save_cart(&session, &cart).await?;
    Ok(Json(CartView::from(&cart)))
}

/// Unit count for the header badge.
#[instrument(skip(session))]
pub async fn count(session: Session) -> Result<Json<Value>> {
    let cart = load_cart(&session).await;
    Ok(Json(json!({ "count": cart.item_count() })))
}
