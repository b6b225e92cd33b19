//! The wishlist collection and its mutation API.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::commerce::{Collection, ProductSnapshot};
use crate::types::{LineId, Price, ProductId};

/// A single saved product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WishlistEntry {
    /// Opaque entry identifier, generated at insertion time.
    pub id: LineId,
    /// Catalog entry this wish refers to.
    pub product_id: ProductId,
    /// When the product was saved.
    pub added_at: DateTime<Utc>,
    /// Product data captured at add-time, never revalidated.
    pub product: ProductSnapshot,
}

/// Result of [`Wishlist::toggle`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum WishlistToggle {
    Added,
    Removed,
}

/// A customer's wishlist.
///
/// Holds at most one entry per product; adds are idempotent.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Wishlist {
    entries: Vec<WishlistEntry>,
}

impl Wishlist {
    /// Create a wishlist from existing entries (e.g. loaded from a store).
    #[must_use]
    pub const fn from_entries(entries: Vec<WishlistEntry>) -> Self {
        Self { entries }
    }

    /// The entries in insertion order.
    #[must_use]
    pub fn entries(&self) -> &[WishlistEntry] {
        &self.entries
    }

    /// Number of entries.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the wishlist has no entries.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Whether a product is saved.
    #[must_use]
    pub fn contains(&self, product_id: ProductId) -> bool {
        self.entries.iter().any(|e| e.product_id == product_id)
    }

    /// Save a product. Idempotent: a no-op if the product is already saved.
    ///
    /// Returns `true` if an entry was inserted.
    pub fn add(&mut self, product: ProductSnapshot) -> bool {
        if self.contains(product.id) {
            return false;
        }
        self.entries.push(WishlistEntry {
            id: LineId::generate(),
            product_id: product.id,
            added_at: Utc::now(),
            product,
        });
        true
    }

    /// Remove a saved product. A no-op if the product is not saved.
    pub fn remove(&mut self, product_id: ProductId) {
        self.entries.retain(|e| e.product_id != product_id);
    }

    /// Save the product if absent, remove it if present.
    pub fn toggle(&mut self, product: ProductSnapshot) -> WishlistToggle {
        if self.contains(product.id) {
            self.remove(product.id);
            WishlistToggle::Removed
        } else {
            self.add(product);
            WishlistToggle::Added
        }
    }

    /// Remove all entries.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Sum of the snapshot prices of all saved products.
    #[must_use]
    pub fn total_value(&self) -> Price {
        self.entries
            .iter()
            .fold(Price::ZERO, |sum, e| sum.plus(e.product.price))
    }
}

impl Collection for Wishlist {
    const KIND: &'static str = "wishlist";

    fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot(id: i64, rupees: i64) -> ProductSnapshot {
        ProductSnapshot {
            id: ProductId::new(id),
            name: format!("Artwork {id}"),
            category: "digital".to_owned(),
            image: format!("/digi_art/digi_art{id}.webp"),
            price: Price::from_rupees(rupees),
        }
    }

    #[test]
    fn add_is_idempotent() {
        let mut wishlist = Wishlist::default();
        assert!(wishlist.add(snapshot(2, 3000)));
        assert!(!wishlist.add(snapshot(2, 3000)));
        assert_eq!(wishlist.len(), 1);
    }

    #[test]
    fn toggle_alternates() {
        let mut wishlist = Wishlist::default();
        assert_eq!(wishlist.toggle(snapshot(5, 4000)), WishlistToggle::Added);
        assert!(wishlist.contains(ProductId::new(5)));
        assert_eq!(wishlist.toggle(snapshot(5, 4000)), WishlistToggle::Removed);
        assert!(wishlist.is_empty());
    }

    #[test]
    fn remove_of_unsaved_product_is_a_noop() {
        let mut wishlist = Wishlist::default();
        wishlist.add(snapshot(1, 2500));
        let before = wishlist.clone();
        wishlist.remove(ProductId::new(99));
        assert_eq!(wishlist, before);
    }

    #[test]
    fn total_value_sums_snapshot_prices() {
        let mut wishlist = Wishlist::default();
        wishlist.add(snapshot(1, 2500));
        wishlist.add(snapshot(2, 3000));
        assert_eq!(wishlist.total_value(), Price::from_rupees(5500));
    }
}
