//! Cart and wishlist collections and their mutation API.
//!
//! Everything in this module is a pure in-memory transform: mutations cannot
//! fail and never perform I/O. Persistence and reconciliation against guest
//! and server stores live in the storefront crate, which wraps these
//! collections in its sync engine.

pub mod cart;
pub mod product;
pub mod wishlist;

pub use cart::{AddToCart, Cart, CartLine, CartSummary};
pub use product::ProductSnapshot;
pub use wishlist::{Wishlist, WishlistEntry, WishlistToggle};

use serde::Serialize;
use serde::de::DeserializeOwned;

/// A persistable item collection.
///
/// Implemented by [`Cart`] and [`Wishlist`]; the storefront's reconciliation
/// engine is generic over this trait so both collections run the identical
/// routine without sharing state.
pub trait Collection: Default + Clone + Serialize + DeserializeOwned + Send {
    /// Short name used in log messages ("cart", "wishlist").
    const KIND: &'static str;

    /// Whether the collection holds no items.
    fn is_empty(&self) -> bool;
}
