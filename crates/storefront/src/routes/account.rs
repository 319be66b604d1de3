//! Account route handlers (require auth).

use axum::{Json, extract::State};
use tower_sessions::Session;
use tracing::instrument;

use pampa_core::order::Order;
use pampa_core::profile::UserProfile;
use pampa_core::store::Stored;

use crate::error::Result;
use crate::routes::auth::require_user;
use crate::services::users::{self, ProfileUpdate};
use crate::state::AppState;

/// Current user's profile, created lazily on first access.
#[instrument(skip(state, session))]
pub async fn profile(
    State(state): State<AppState>,
    session: Session,
) -> Result<Json<UserProfile>> {
    let user = require_user(&session).await?;
    let profile =
        users::get_or_create_profile(state.store().as_ref(), &user.id, &user.email).await?;
    Ok(Json(profile))
}

/// Update display name, phone or the saved address.
#[instrument(skip(state, session, update))]
pub async fn update_profile(
    State(state): State<AppState>,
    session: Session,
    Json(update): Json<ProfileUpdate>,
) -> Result<Json<UserProfile>> {
    let user = require_user(&session).await?;
    let profile =
        users::update_profile(state.store().as_ref(), &user.id, &user.email, update).await?;
    Ok(Json(profile))
}

/// Current user's order history, newest first.
#[instrument(skip(state, session))]
pub async fn orders(
    State(state): State<AppState>,
    session: Session,
) -> Result<Json<Vec<Stored<Order>>>> {
    let user = require_user(&session).await?;
    let orders = users::user_orders(state.store().as_ref(), &user.id).await?;
    Ok(Json(orders))
}
