//! Guest store adapter over tower-sessions.
//!
//! The visitor's session cookie plays the role of browser-local storage: it
//! survives across requests for the same visitor and is gone for everyone
//! else. Keys are the fixed `guest_cart` / `guest_wishlist` constants.

use tower_sessions::Session;

use super::store::{GuestStore, StoreError};

/// Session-backed guest store.
#[derive(Debug, Clone)]
pub struct SessionGuestStore {
    session: Session,
}

impl SessionGuestStore {
    /// Wrap the request's session.
    #[must_use]
    pub const fn new(session: Session) -> Self {
        Self { session }
    }
}

impl GuestStore for SessionGuestStore {
    async fn get(&self, key: &str) -> Option<String> {
        self.session.get::<String>(key).await.ok().flatten()
    }

    async fn set(&self, key: &str, value: String) -> Result<(), StoreError> {
        self.session
            .insert(key, value)
            .await
            .map_err(|e| StoreError::Unavailable(e.to_string()))
    }

    async fn remove(&self, key: &str) -> Result<(), StoreError> {
        self.session
            .remove::<String>(key)
            .await
            .map(|_| ())
            .map_err(|e| StoreError::Unavailable(e.to_string()))
    }
}
