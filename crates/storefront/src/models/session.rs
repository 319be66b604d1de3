//! Session-related types.
//!
//! Types stored in the session for authentication state.

use serde::{Deserialize, Serialize};

use pampa_core::types::{Email, UserId};

/// Session-stored user identity.
///
/// Minimal data stored in the session to identify the logged-in user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrentUser {
    /// Auth provider user id (also the profile document id).
    pub id: UserId,
    /// User's email address.
    pub email: Email,
    /// Display name shown in the header and used for guest-free orders.
    pub display_name: String,
}

/// Session keys.
pub mod session_keys {
    /// Key for storing the current logged-in user.
    pub const CURRENT_USER: &str = "current_user";

    /// Key for storing the cart state.
    pub const CART: &str = "cart";
}
