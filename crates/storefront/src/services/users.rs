//! Customer profiles and order history.

use chrono::Utc;
use serde::Deserialize;
use tracing::instrument;

use pampa_core::address::Address;
use pampa_core::order::Order;
use pampa_core::profile::UserProfile;
use pampa_core::store::{DocumentStore, Query, StoreError, Stored, collections};
use pampa_core::types::{Email, UserId};

/// Fetch a user's profile, creating a default one if the auth provider
/// knows the user but no profile document exists yet.
///
/// # Errors
///
/// Returns [`StoreError`] if the backend read or the lazy create fails.
#[instrument(skip(store, email))]
pub async fn get_or_create_profile(
    store: &dyn DocumentStore,
    user_id: &UserId,
    email: &Email,
) -> Result<UserProfile, StoreError> {
    if let Some(doc) = store.get(collections::USERS, user_id.as_str()).await? {
        return serde_json::from_value(doc)
            .map_err(|e| StoreError::Corrupt(format!("profile {user_id}: {e}")));
    }

    let profile = UserProfile::new(email.clone(), "", Utc::now());
    let doc = serde_json::to_value(&profile)
        .map_err(|e| StoreError::Corrupt(format!("profile {user_id}: {e}")))?;
    store.upsert(collections::USERS, user_id.as_str(), doc).await?;
    Ok(profile)
}

/// Fields a customer can change on their profile.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProfileUpdate {
    pub display_name: Option<String>,
    pub phone: Option<String>,
    pub address: Option<Address>,
}

/// Apply a profile update and return the stored result.
///
/// The saved address also refreshes the composed single-line
/// `display_address` kept for list views.
///
/// # Errors
///
/// Returns [`StoreError`] if the read-modify-write fails.
#[instrument(skip(store, update))]
pub async fn update_profile(
    store: &dyn DocumentStore,
    user_id: &UserId,
    email: &Email,
    update: ProfileUpdate,
) -> Result<UserProfile, StoreError> {
    let mut profile = get_or_create_profile(store, user_id, email).await?;
    let now = Utc::now();

    if let Some(display_name) = update.display_name {
        profile.display_name = display_name;
        profile.updated_at = now;
    }
    if let Some(phone) = update.phone {
        profile.phone = phone;
        profile.updated_at = now;
    }
    if let Some(address) = update.address {
        profile.set_address(address, now);
    }

    let doc = serde_json::to_value(&profile)
        .map_err(|e| StoreError::Corrupt(format!("profile {user_id}: {e}")))?;
    store.upsert(collections::USERS, user_id.as_str(), doc).await?;
    Ok(profile)
}

/// A user's orders, newest first.
///
/// # Errors
///
/// Returns [`StoreError`] if the backend query fails.
#[instrument(skip(store))]
pub async fn user_orders(
    store: &dyn DocumentStore,
    user_id: &UserId,
) -> Result<Vec<Stored<Order>>, StoreError> {
    let query = Query::new()
        .filter("user_id", user_id.as_str())
        .order_by_desc("created_at");
    let raw = store.query(collections::ORDERS, query).await?;

    Ok(raw
        .into_iter()
        .filter_map(|stored| match stored.decode::<Order>() {
            Ok(order) => Some(order),
            Err(e) => {
                tracing::warn!("skipping malformed order document: {e}");
                None
            }
        })
        .collect())
}
