//! Admin middleware: session layer and the admin-role gate.

pub mod auth;

pub use auth::{CurrentAdmin, RequireAdmin};

use time::Duration;
use tower_sessions::{Expiry, MemoryStore, SessionManagerLayer};

/// Create the session layer for admin logins.
#[must_use]
pub fn create_session_layer() -> SessionManagerLayer<MemoryStore> {
    SessionManagerLayer::new(MemoryStore::default())
        .with_secure(false)
        .with_expiry(Expiry::OnInactivity(Duration::hours(12)))
}
