//! Admin authentication extractor.
//!
//! [`RequireAdmin`] gates every back-office handler. It reads the
//! session identity and re-checks the `admin` role against the users
//! collection on each request, so revoking the role takes effect
//! immediately rather than at next login.

use axum::{extract::FromRequestParts, http::request::Parts};
use serde::{Deserialize, Serialize};
use tower_sessions::Session;

use pampa_core::profile::UserProfile;
use pampa_core::store::{DocumentStore, collections};
use pampa_core::types::{Email, UserId};

use crate::error::AppError;
use crate::state::AppState;

/// Session key for the signed-in admin.
pub const CURRENT_ADMIN_KEY: &str = "current_admin";

/// Session-stored admin identity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrentAdmin {
    pub id: UserId,
    pub email: Email,
    pub display_name: String,
}

/// Extractor that requires an authenticated admin.
///
/// # Example
///
/// ```rust,ignore
/// async fn protected_handler(
///     RequireAdmin(admin): RequireAdmin,
/// ) -> impl IntoResponse {
///     format!("Hola, {}!", admin.display_name)
/// }
/// ```
pub struct RequireAdmin(pub CurrentAdmin);

impl FromRequestParts<AppState> for RequireAdmin {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        // Session is placed in extensions by SessionManagerLayer
        let session = parts
            .extensions
            .get::<Session>()
            .ok_or_else(|| AppError::Unauthorized("no session layer".to_owned()))?;

        let admin: CurrentAdmin = session
            .get(CURRENT_ADMIN_KEY)
            .await
            .ok()
            .flatten()
            .ok_or_else(|| AppError::Unauthorized("not logged in".to_owned()))?;

        // Role check against the live profile, not the session snapshot
        let profile = state
            .store()
            .get(collections::USERS, admin.id.as_str())
            .await?
            .ok_or_else(|| AppError::Forbidden("profile missing".to_owned()))?;
        let profile: UserProfile = serde_json::from_value(profile)
            .map_err(|e| AppError::Internal(format!("profile: {e}")))?;

        if !profile.is_admin() {
            return Err(AppError::Forbidden(format!(
                "user {} is not an admin",
                admin.id
            )));
        }

        Ok(Self(admin))
    }
}
