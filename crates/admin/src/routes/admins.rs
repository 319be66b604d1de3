//! Admin role management.

use axum::{Json, extract::State};
use chrono::Utc;
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::instrument;

use pampa_core::store::{DocumentStore, Query, collections};
use pampa_core::types::UserRole;

use crate::error::{AppError, Result};
use crate::middleware::RequireAdmin;
use crate::state::AppState;

/// Grant form: the account's email.
#[derive(Debug, Deserialize)]
pub struct GrantForm {
    pub email: String,
    /// Defaults to granting; `false` revokes.
    pub admin: Option<bool>,
}

/// Set or clear the admin role on a user profile, looked up by email.
#[instrument(skip(state, form))]
pub async fn grant(
    RequireAdmin(actor): RequireAdmin,
    State(state): State<AppState>,
    Json(form): Json<GrantForm>,
) -> Result<Json<Value>> {
    let matches = state
        .store()
        .query(
            collections::USERS,
            Query::new().filter("email", form.email.as_str()).limit(1),
        )
        .await?;

    let target = matches
        .into_iter()
        .next()
        .ok_or_else(|| AppError::NotFound(format!("usuario {}", form.email)))?;

    let role = if form.admin.unwrap_or(true) {
        UserRole::Admin
    } else {
        UserRole::User
    };

    state
        .store()
        .update(
            collections::USERS,
            &target.id,
            json!({ "role": role, "updated_at": Utc::now() }),
        )
        .await?;

    tracing::info!(user_id = %target.id, %role, actor = %actor.id, "role updated");
    Ok(Json(json!({ "id": target.id, "role": role })))
}
