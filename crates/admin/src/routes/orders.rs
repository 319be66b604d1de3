//! Order management route handlers.
//!
//! Listing is pass-through; the status endpoint is the only mutation
//! and goes through the core lifecycle rules before anything is
//! written. Tracking numbers are accepted only on the transition into
//! `shipped`.

use axum::{
    Json,
    extract::{Path, Query as UrlQuery, State},
};
use chrono::Utc;
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::instrument;

use pampa_core::order::Order;
use pampa_core::store::{DocumentStore, Query, Stored, collections};
use pampa_core::types::OrderStatus;

use crate::error::{AppError, Result};
use crate::middleware::RequireAdmin;
use crate::state::AppState;

const DEFAULT_RECENT_LIMIT: usize = 10;

/// Query string for the order listing.
#[derive(Debug, Deserialize)]
pub struct ListParams {
    pub status: Option<OrderStatus>,
}

/// Query string for the recent-orders listing.
#[derive(Debug, Deserialize)]
pub struct RecentParams {
    pub limit: Option<usize>,
}

/// Status transition form.
#[derive(Debug, Deserialize)]
pub struct StatusForm {
    pub status: OrderStatus,
    pub tracking_number: Option<String>,
}

fn decode_orders(raw: Vec<Stored<Value>>) -> Vec<Stored<Order>> {
    raw.into_iter()
        .filter_map(|stored| match stored.decode::<Order>() {
            Ok(order) => Some(order),
            Err(e) => {
                tracing::warn!("skipping malformed order document: {e}");
                None
            }
        })
        .collect()
}

/// All orders, newest first, optionally filtered by status.
#[instrument(skip(state))]
pub async fn list(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    UrlQuery(params): UrlQuery<ListParams>,
) -> Result<Json<Vec<Stored<Order>>>> {
    let mut query = Query::new().order_by_desc("created_at");
    if let Some(status) = params.status {
        query = query.filter("status", status.to_string());
    }
    let raw = state.store().query(collections::ORDERS, query).await?;
    Ok(Json(decode_orders(raw)))
}

/// Most recent orders for the dashboard.
#[instrument(skip(state))]
pub async fn recent(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    UrlQuery(params): UrlQuery<RecentParams>,
) -> Result<Json<Vec<Stored<Order>>>> {
    let query = Query::new()
        .order_by_desc("created_at")
        .limit(params.limit.unwrap_or(DEFAULT_RECENT_LIMIT));
    let raw = state.store().query(collections::ORDERS, query).await?;
    Ok(Json(decode_orders(raw)))
}

/// Order detail.
#[instrument(skip(state))]
pub async fn show(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Stored<Order>>> {
    let doc = state
        .store()
        .get(collections::ORDERS, &id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("pedido {id}")))?;
    let stored = Stored { id, doc }.decode::<Order>()?;
    Ok(Json(stored))
}

/// Apply a lifecycle transition to an order.
///
/// Rules enforced before the write:
/// - the transition must be legal (`pending -> shipped -> delivered`,
///   or `pending -> cancelled`); terminal states reject everything;
/// - a tracking number may only be set entering `shipped`.
#[instrument(skip(state, form))]
pub async fn update_status(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(form): Json<StatusForm>,
) -> Result<Json<Value>> {
    let doc = state
        .store()
        .get(collections::ORDERS, &id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("pedido {id}")))?;
    let order: Order = serde_json::from_value(doc)
        .map_err(|e| AppError::Internal(format!("order {id}: {e}")))?;

    if !order.status.can_transition(form.status) {
        return Err(AppError::InvalidTransition {
            from: order.status,
            to: form.status,
        });
    }

    let tracking = form
        .tracking_number
        .as_deref()
        .map(str::trim)
        .filter(|t| !t.is_empty());
    if tracking.is_some() && form.status != OrderStatus::Shipped {
        return Err(AppError::BadRequest(
            "el número de seguimiento solo se asigna al enviar".to_owned(),
        ));
    }

    let mut patch = json!({
        "status": form.status,
        "updated_at": Utc::now(),
    });
    if let (Some(tracking), Value::Object(map)) = (tracking, &mut patch) {
        map.insert(
            "tracking_number".to_owned(),
            Value::String(tracking.to_owned()),
        );
    }

    state.store().update(collections::ORDERS, &id, patch).await?;

    tracing::info!(
        order_id = %id,
        admin = %admin.id,
        from = %order.status,
        to = %form.status,
        "order status updated"
    );
    Ok(Json(json!({ "id": id, "status": form.status })))
}
