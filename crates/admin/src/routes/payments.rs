//! Payment method route handlers.
//!
//! The collection is seeded with the defaults (bank transfer enabled,
//! gateway disabled) the first time it is listed empty, the same
//! lazy-init the zone table uses.

use std::collections::BTreeMap;

use axum::{
    Json,
    extract::{Path, State},
};
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::instrument;

use pampa_core::payment::{PaymentMethod, default_payment_methods};
use pampa_core::store::{DocumentStore, Query, StoreError, Stored, collections};

use crate::error::{AppError, Result};
use crate::middleware::RequireAdmin;
use crate::state::AppState;

/// Merge-update form for a payment method.
#[derive(Debug, Deserialize)]
pub struct PaymentMethodForm {
    pub name: Option<String>,
    pub enabled: Option<bool>,
    /// Replaces the whole config map when present.
    pub config: Option<BTreeMap<String, String>>,
}

async fn seed_defaults(store: &dyn DocumentStore) -> std::result::Result<(), StoreError> {
    for (id, method) in default_payment_methods() {
        let doc = serde_json::to_value(&method)
            .map_err(|e| StoreError::Corrupt(format!("payment method {id}: {e}")))?;
        store.upsert(collections::PAYMENT_METHODS, &id, doc).await?;
    }
    Ok(())
}

/// List payment methods, seeding the defaults when the collection is
/// empty.
#[instrument(skip(state))]
pub async fn list(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
) -> Result<Json<Vec<Stored<PaymentMethod>>>> {
    let mut raw = state
        .store()
        .query(collections::PAYMENT_METHODS, Query::new())
        .await?;

    if raw.is_empty() {
        tracing::info!("payment_methods collection empty, seeding defaults");
        seed_defaults(state.store().as_ref()).await?;
        raw = state
            .store()
            .query(collections::PAYMENT_METHODS, Query::new())
            .await?;
    }

    let methods = raw
        .into_iter()
        .filter_map(|stored| match stored.decode::<PaymentMethod>() {
            Ok(method) => Some(method),
            Err(e) => {
                tracing::warn!("skipping malformed payment method: {e}");
                None
            }
        })
        .collect();
    Ok(Json(methods))
}

/// Merge-update a payment method's name, enabled flag or config.
#[instrument(skip(state, form))]
pub async fn update(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(form): Json<PaymentMethodForm>,
) -> Result<Json<Value>> {
    let mut patch = serde_json::Map::new();
    if let Some(name) = form.name {
        patch.insert("name".to_owned(), Value::String(name));
    }
    if let Some(enabled) = form.enabled {
        patch.insert("enabled".to_owned(), Value::Bool(enabled));
    }
    if let Some(config) = form.config {
        patch.insert("config".to_owned(), json!(config));
    }
    if patch.is_empty() {
        return Err(AppError::BadRequest("nada para actualizar".to_owned()));
    }

    state
        .store()
        .update(collections::PAYMENT_METHODS, &id, Value::Object(patch))
        .await?;

    tracing::info!(method = %id, admin = %admin.id, "payment method updated");
    Ok(Json(json!({ "id": id })))
}

/// Flip a payment method's enabled flag.
#[instrument(skip(state))]
pub async fn toggle(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Value>> {
    let doc = state
        .store()
        .get(collections::PAYMENT_METHODS, &id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("método de pago {id}")))?;
    let method: PaymentMethod = serde_json::from_value(doc)
        .map_err(|e| AppError::Internal(format!("payment method {id}: {e}")))?;

    let enabled = !method.enabled;
    state
        .store()
        .update(
            collections::PAYMENT_METHODS,
            &id,
            json!({ "enabled": enabled }),
        )
        .await?;

    tracing::info!(method = %id, enabled, admin = %admin.id, "payment method toggled");
    Ok(Json(json!({ "id": id, "enabled": enabled })))
}
