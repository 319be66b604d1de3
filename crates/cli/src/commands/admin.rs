//! Grant or revoke the admin role.

use chrono::Utc;
use serde_json::json;
use tracing::info;

use pampa_core::store::{DocumentStore, Query, collections};
use pampa_core::types::UserRole;

/// Set a user's role by email. The account must already exist (register
/// through the storefront first).
///
/// # Errors
///
/// Returns an error if the user is missing or the write fails.
pub async fn set_role(email: &str, admin: bool) -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    let store = pampa_backend::store_from_env().await?;

    let matches = store
        .query(
            collections::USERS,
            Query::new().filter("email", email).limit(1),
        )
        .await?;

    let Some(target) = matches.into_iter().next() else {
        return Err(format!("no account found for {email}").into());
    };

    let role = if admin { UserRole::Admin } else { UserRole::User };
    store
        .update(
            collections::USERS,
            &target.id,
            json!({ "role": role, "updated_at": Utc::now() }),
        )
        .await?;

    info!(user_id = %target.id, %role, "Role updated");
    Ok(())
}
