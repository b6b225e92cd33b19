//! Denormalized product snapshots.

use serde::{Deserialize, Serialize};

use crate::types::{Price, ProductId};

/// A denormalized snapshot of a catalog entry, captured at add-time.
///
/// Cart lines and wishlist entries carry the snapshot instead of a live
/// catalog reference; it is never re-fetched or revalidated, so a price
/// change in the catalog does not retroactively change a cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductSnapshot {
    /// Catalog entry this snapshot was taken from.
    pub id: ProductId,
    /// Product name at add-time.
    pub name: String,
    /// Product category at add-time (e.g. "digital", "physical").
    pub category: String,
    /// Image path at add-time.
    pub image: String,
    /// Unit price at add-time.
    pub price: Price,
}
