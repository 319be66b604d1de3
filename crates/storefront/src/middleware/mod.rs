//! HTTP middleware for the storefront.

mod request_id;

pub use request_id::{REQUEST_ID_HEADER, request_id_middleware};

use time::Duration;
use tower_sessions::{Expiry, MemoryStore, SessionManagerLayer};

/// Create the session layer.
///
/// Sessions hold the cart state and the signed-in user. The in-process
/// store is enough for a single-instance deployment; swapping in a
/// shared store only changes this constructor.
#[must_use]
pub fn create_session_layer() -> SessionManagerLayer<MemoryStore> {
    SessionManagerLayer::new(MemoryStore::default())
        .with_secure(false)
        .with_expiry(Expiry::OnInactivity(Duration::days(7)))
}
