//! Guest/server persistence and reconciliation for carts and wishlists.
//!
//! The collections themselves (and their mutation API) live in
//! `aroura-core`; this module decides *where* a collection is read from and
//! written to. The moving parts:
//!
//! - [`store`] - the `GuestStore` / `RemoteStore` traits and adapters
//! - [`sync`] - the reconciliation engine that picks the authoritative store
//!   on every identity resolution and gates server writes behind a
//!   successful initial read
//! - [`session_store`] - the tower-sessions guest store adapter
//!
//! The cart and the wishlist each run their own engine instance; they share
//! code but never state.

pub mod session_store;
pub mod store;
pub mod sync;

pub use session_store::SessionGuestStore;
pub use store::{GuestStore, MemoryGuestStore, MemoryRemoteStore, RemoteStore, StoreError};
pub use sync::{AuthState, AuthStatus, Reconciliation, SyncedCollection};

/// Guest store key for the cart collection.
///
/// Fixed and shared across all guests; the store itself is visitor-scoped.
pub const GUEST_CART_KEY: &str = "guest_cart";

/// Guest store key for the wishlist collection.
pub const GUEST_WISHLIST_KEY: &str = "guest_wishlist";
