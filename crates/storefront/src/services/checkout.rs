//! Checkout flow: address validation, shipping quote, order placement.
//!
//! The flow is driven by explicit state handed in by the handlers (the
//! session cart and the chosen address); nothing here reads ambient
//! state. Placement is the only write: the assembled order goes to the
//! `orders` collection and the cart is cleared by the caller.

use rust_decimal::Decimal;
use tracing::instrument;

use pampa_core::address::Address;
use pampa_core::order::{Customer, OrderDraft, assemble_order};
use pampa_core::payment::{DEFAULT_PAYMENT_METHOD, PaymentMethod};
use pampa_core::shipping::ShippingQuote;
use pampa_core::store::{DocumentStore, collections};
use pampa_core::types::{OrderId, PaymentMethodId};

use crate::error::{AppError, Result};
use crate::models::CartState;
use crate::state::AppState;

/// A computed quote plus the order totals it implies, returned by the
/// quote endpoint so the client can render the summary.
#[derive(Debug, Clone, serde::Serialize)]
pub struct CheckoutQuote {
    pub shipping: ShippingQuote,
    pub subtotal: Decimal,
    pub total: Decimal,
    /// `true` when the quote is the degraded sentinel; the client must
    /// show "contactar soporte" and disable placement.
    pub degraded: bool,
}

/// Validate the address and quote shipping for the current cart.
///
/// A degraded quote is not an error here - the customer sees the
/// contact-support estimate while correcting the situation - but
/// [`place_order`] will refuse it.
///
/// # Errors
///
/// Returns [`AppError::Order`] when the cart is empty and
/// [`AppError::Address`] when the address fails validation.
#[instrument(skip(state, cart, address))]
pub async fn quote(state: &AppState, cart: &CartState, address: &Address) -> Result<CheckoutQuote> {
    if cart.is_empty() {
        return Err(AppError::Order(pampa_core::order::OrderError::EmptyCart));
    }
    address.validate()?;

    let shipping = state
        .shipping()
        .quote(&address.postal_code, cart.shipping_weight_kg())
        .await;

    let subtotal = cart.subtotal();
    let total = subtotal + shipping.total_cost;
    let degraded = shipping.is_degraded();

    Ok(CheckoutQuote {
        shipping,
        subtotal,
        total,
        degraded,
    })
}

/// Place an order: recompute the quote server-side, assemble through the
/// core, persist, and return the new order id and total.
///
/// The quote is never taken from the client; it is recomputed from the
/// cart's weight snapshot so a stale or tampered quote cannot change
/// what the customer owes.
///
/// # Errors
///
/// Returns [`AppError::BadRequest`] for a disabled payment method and
/// the usual validation/order errors otherwise.
#[instrument(skip(state, cart, address, customer))]
pub async fn place_order(
    state: &AppState,
    cart: &CartState,
    address: Address,
    customer: Customer,
    payment_method: Option<PaymentMethodId>,
) -> Result<(OrderId, Decimal)> {
    let payment_method =
        payment_method.unwrap_or_else(|| PaymentMethodId::new(DEFAULT_PAYMENT_METHOD));
    ensure_payment_method_enabled(state, &payment_method).await?;

    if cart.is_empty() {
        return Err(AppError::Order(pampa_core::order::OrderError::EmptyCart));
    }

    let shipping = state
        .shipping()
        .quote(&address.postal_code, cart.shipping_weight_kg())
        .await;

    let order = assemble_order(OrderDraft {
        customer,
        items: cart.to_line_items(),
        shipping,
        shipping_address: address,
        payment_method,
    })?;

    let doc = serde_json::to_value(&order).map_err(|e| AppError::Internal(e.to_string()))?;
    let id = state.store().insert(collections::ORDERS, doc).await?;

    tracing::info!(order_id = %id, total = %order.total, "order placed");

    Ok((OrderId::new(id), order.total))
}

/// A payment method must exist and be enabled. The default bank-transfer
/// method is accepted even before the collection has been seeded, so a
/// fresh deployment can take orders.
async fn ensure_payment_method_enabled(
    state: &AppState,
    method: &PaymentMethodId,
) -> Result<()> {
    let doc = state
        .store()
        .get(collections::PAYMENT_METHODS, method.as_str())
        .await?;

    match doc {
        Some(doc) => {
            let method_doc: PaymentMethod = serde_json::from_value(doc)
                .map_err(|e| AppError::Internal(format!("payment method: {e}")))?;
            if method_doc.enabled {
                Ok(())
            } else {
                Err(AppError::BadRequest(
                    "método de pago no disponible".to_owned(),
                ))
            }
        }
        None if method.as_str() == DEFAULT_PAYMENT_METHOD => Ok(()),
        None => Err(AppError::BadRequest(
            "método de pago no disponible".to_owned(),
        )),
    }
}
