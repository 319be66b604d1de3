//! Order confirmation route handler.

use axum::{
    Json,
    extract::{Path, State},
};
use tracing::instrument;

use pampa_core::order::Order;
use pampa_core::store::{DocumentStore, Stored, collections};

use crate::error::{AppError, Result};
use crate::state::AppState;

/// Order confirmation view.
///
/// Fetched by id straight off the confirmation redirect, so no auth
/// gate: the id is the capability, exactly as the production flow works.
#[instrument(skip(state))]
pub async fn show(
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
