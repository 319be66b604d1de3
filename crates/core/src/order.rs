//! Cart line items and order assembly.
//!
//! [`assemble_order`] is the single place orders come into existence: it
//! snapshots the cart, the shipping quote and the address into an
//! immutable record. After assembly only status-transition operations
//! (admin side) touch an order; totals are never recomputed.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::address::{Address, AddressError};
use crate::shipping::ShippingQuote;
use crate::types::{Email, OrderStatus, PaymentMethodId, ProductId, UserId};

/// A cart line frozen into the order: product identity, display name and
/// unit price at the time of purchase.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineItem {
    pub product_id: ProductId,
    pub name: String,
    pub unit_price: Decimal,
    pub quantity: u32,
}

impl LineItem {
    /// `unit_price * quantity`.
    #[must_use]
    pub fn line_total(&self) -> Decimal {
        self.unit_price * Decimal::from(self.quantity)
    }
}

/// Who placed the order. Guests get a display name and email without a
/// user id.
///
/// Flattened into the order document with `customer_`-prefixed field
/// names; `user_id` stays top-level so the store can filter order
/// history by account.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Customer {
    #[serde(rename = "customer_name")]
    pub name: String,
    #[serde(rename = "customer_email")]
    pub email: Email,
    #[serde(rename = "user_id", default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<UserId>,
}

/// Inputs to [`assemble_order`], gathered by the checkout flow.
#[derive(Debug, Clone)]
pub struct OrderDraft {
    pub customer: Customer,
    pub items: Vec<LineItem>,
    pub shipping: ShippingQuote,
    pub shipping_address: Address,
    pub payment_method: PaymentMethodId,
}

/// The immutable snapshot of a placed purchase.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    #[serde(flatten)]
    pub customer: Customer,
    pub items: Vec<LineItem>,
    /// Sum of line totals, before shipping.
    pub subtotal: Decimal,
    pub shipping: ShippingQuote,
    pub shipping_address: Address,
    /// `subtotal + shipping.total_cost`.
    pub total: Decimal,
    pub payment_method: PaymentMethodId,
    pub status: OrderStatus,
    /// Set by the carrier hand-off, only once the order ships.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tracking_number: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Why an order could not be assembled.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum OrderError {
    /// The cart has no line items.
    #[error("el carrito está vacío")]
    EmptyCart,
    /// The shipping quote is the degraded sentinel; cost calculation was
    /// unavailable, so placement must be blocked.
    #[error("el costo de envío no está disponible")]
    ShippingUnavailable,
    /// The shipping address failed validation.
    #[error(transparent)]
    InvalidAddress(#[from] AddressError),
}

/// Assemble an order from a checkout draft.
///
/// Preconditions, checked in order and failing fast: the cart is
/// non-empty, the quote is not the degraded sentinel, and the address
/// validates. On success the record carries `status = pending`, no
/// tracking number, and a creation timestamp taken at assembly time.
///
/// Persistence, inventory decrement, payment capture and notifications
/// are all outside this function - the caller hands the record to the
/// store.
///
/// # Errors
///
/// Returns an [`OrderError`] naming the violated precondition; an order
/// is never partially assembled.
pub fn assemble_order(draft: OrderDraft) -> Result<Order, OrderError> {
    if draft.items.is_empty() {
        return Err(OrderError::EmptyCart);
    }

    if draft.shipping.is_degraded() {
        return Err(OrderError::ShippingUnavailable);
    }

    draft.shipping_address.validate()?;

    let subtotal: Decimal = draft.items.iter().map(LineItem::line_total).sum();
    let total = subtotal + draft.shipping.total_cost;

    Ok(Order {
        customer: draft.customer,
        items: draft.items,
        subtotal,
        shipping: draft.shipping,
        shipping_address: draft.shipping_address,
        total,
        payment_method: draft.payment_method,
        status: OrderStatus::Pending,
        tracking_number: None,
        created_at: Utc::now(),
    })
}
