//! Session-held state for the storefront.

mod cart;
mod session;

pub use cart::{CartItem, CartState};
pub use session::{CurrentUser, session_keys};
