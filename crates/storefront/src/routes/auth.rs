//! Authentication route handlers.
//!
//! Thin delegation to the auth provider; the session stores the
//! resulting identity as [`CurrentUser`].

use axum::{Json, extract::State};
use serde::Deserialize;
use serde_json::{Value, json};
use tower_sessions::Session;
use tracing::instrument;

use pampa_core::store::AuthProvider;
use pampa_core::types::Email;

use crate::error::{AppError, Result, clear_sentry_user, set_sentry_user};
use crate::models::{CurrentUser, session_keys};
use crate::state::AppState;

/// Registration form data.
#[derive(Debug, Deserialize)]
pub struct RegisterForm {
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub display_name: String,
}

/// Login form data.
#[derive(Debug, Deserialize)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

/// Fetch the signed-in user from the session, if any.
pub async fn current_user(session: &Session) -> Option<CurrentUser> {
    session
        .get::<CurrentUser>(session_keys::CURRENT_USER)
        .await
        .ok()
        .flatten()
}

/// Fetch the signed-in user or fail with 401.
///
/// # Errors
///
/// Returns [`AppError::Unauthorized`] when no user is in the session.
pub async fn require_user(session: &Session) -> Result<CurrentUser> {
    current_user(session)
        .await
        .ok_or_else(|| AppError::Unauthorized("no session".to_owned()))
}

async fn start_session(session: &Session, user: CurrentUser) -> Result<Value> {
    set_sentry_user(&user.id, Some(user.email.as_str()));
    let body =
        serde_json::to_value(&user).map_err(|e| AppError::Internal(e.to_string()))?;
    session
        .insert(session_keys::CURRENT_USER, user)
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?;
    Ok(body)
}

/// Create an account and sign in.
#[instrument(skip(state, session, form))]
pub async fn register(
    State(state): State<AppState>,
    session: Session,
    Json(form): Json<RegisterForm>,
) -> Result<Json<Value>> {
    let email = Email::parse(&form.email)
        .map_err(|e| AppError::BadRequest(format!("email inválido: {e}")))?;

    let user = state
        .auth()
        .register(&email, &form.password, form.display_name.trim())
        .await?;

    let body = start_session(
        &session,
        CurrentUser {
            id: user.id,
            email: user.email,
            display_name: user.display_name,
        },
    )
    .await?;
    Ok(Json(body))
}

/// Sign in with email and password.
#[instrument(skip(state, session, form))]
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    Json(form): Json<LoginForm>,
) -> Result<Json<Value>> {
    let email = Email::parse(&form.email)
        .map_err(|e| AppError::BadRequest(format!("email inválido: {e}")))?;

    let user = state.auth().login(&email, &form.password).await?;

    let body = start_session(
        &session,
        CurrentUser {
            id: user.id,
            email: user.email,
            display_name: user.display_name,
        },
    )
    .await?;
    Ok(Json(body))
}

/// Sign out: drop the whole session (cart included).
#[instrument(skip(session))]
pub async fn logout(session: Session) -> Result<Json<Value>> {
    clear_sentry_user();
    session
        .flush()
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?;
    Ok(Json(json!({ "ok": true })))
}
