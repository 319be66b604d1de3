//! Admin authentication route handlers.
//!
//! Same credential flow as the storefront, plus the role check: an
//! account without the admin role cannot open a back-office session at
//! all.

use axum::{Json, extract::State};
use serde::Deserialize;
use serde_json::{Value, json};
use tower_sessions::Session;
use tracing::instrument;

use pampa_core::profile::UserProfile;
use pampa_core::store::{AuthProvider, DocumentStore, collections};
use pampa_core::types::Email;

use crate::error::{AppError, Result};
use crate::middleware::CurrentAdmin;
use crate::middleware::auth::CURRENT_ADMIN_KEY;
use crate::state::AppState;

/// Login form data.
#[derive(Debug, Deserialize)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

/// Sign in; rejects non-admin accounts with 403.
#[instrument(skip(state, session, form))]
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    Json(form): Json<LoginForm>,
) -> Result<Json<Value>> {
    let email = Email::parse(&form.email)
        .map_err(|e| AppError::BadRequest(format!("email inválido: {e}")))?;

    let user = state.auth().login(&email, &form.password).await?;

    let profile = state
        .store()
        .get(collections::USERS, user.id.as_str())
        .await?
        .ok_or_else(|| AppError::Forbidden("profile missing".to_owned()))?;
    let profile: UserProfile = serde_json::from_value(profile)
        .map_err(|e| AppError::Internal(format!("profile: {e}")))?;

    if !profile.is_admin() {
        tracing::warn!(user_id = %user.id, "non-admin login attempt on admin service");
        return Err(AppError::Forbidden("admin role required".to_owned()));
    }

    let admin = CurrentAdmin {
        id: user.id,
        email: user.email,
        display_name: user.display_name,
    };
    let body = json!({ "id": admin.id.clone(), "email": admin.email.clone() });
    session
        .insert(CURRENT_ADMIN_KEY, admin)
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?;

    Ok(Json(body))
}

/// Sign out.
#[instrument(skip(session))]
pub async fn logout(session: Session) -> Result<Json<Value>> {
    session
        .flush()
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?;
    Ok(Json(json!({ "ok": true })))
}
