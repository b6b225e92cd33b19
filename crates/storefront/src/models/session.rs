//! Session-related types.
//!
//! Types stored in the session for authentication state. The guest cart and
//! wishlist documents also live in the session, under the fixed keys owned
//! by the commerce module.

use serde::{Deserialize, Serialize};

use aroura_core::Email;

/// Session-stored user identity.
///
/// Minimal data identifying the logged-in user; the email doubles as the key
/// for server-persisted carts, wishlists and order history.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrentUser {
    /// User's email address.
    pub email: Email,
}

/// Session keys for authentication data.
pub mod session_keys {
    /// Key for storing the current logged-in user.
    pub const CURRENT_USER: &str = "current_user";
}
