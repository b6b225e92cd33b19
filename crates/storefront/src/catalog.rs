//! Static product catalog.
//!
//! The catalog is a fixed set of digital art pieces embedded at compile time
//! from `catalog/products.json`. There is no admin surface for editing it;
//! shipping a new catalog means shipping a new binary.

use std::collections::HashMap;
use std::sync::LazyLock;

use serde::{Deserialize, Serialize};

use aroura_core::{Price, ProductId, ProductSnapshot};

static PRODUCTS_JSON: &str = include_str!("../catalog/products.json");

static CATALOG: LazyLock<Catalog> = LazyLock::new(Catalog::load);

/// A catalog product as served to clients.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub category: String,
    /// Path to the artwork image, relative to the public base URL.
    pub image: String,
    pub price: Price,
    pub description: String,
    pub features: Vec<String>,
    pub rating: f64,
}

impl Product {
    /// The denormalized snapshot frozen into cart lines and orders.
    #[must_use]
    pub fn snapshot(&self) -> ProductSnapshot {
        ProductSnapshot {
            id: self.id,
            name: self.name.clone(),
            category: self.category.clone(),
            image: self.image.clone(),
            price: self.price,
        }
    }
}

/// Sort orders accepted by the product listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SortOrder {
    #[default]
    Featured,
    PriceAsc,
    PriceDesc,
    Name,
}

/// The embedded product catalog.
pub struct Catalog {
    products: Vec<Product>,
    by_id: HashMap<ProductId, usize>,
}

impl Catalog {
    /// The process-wide catalog instance.
    #[must_use]
    pub fn shared() -> &'static Self {
        &CATALOG
    }

    fn load() -> Self {
        // The embedded JSON is part of the source tree; a parse failure is a
        // build defect, not a runtime condition.
        #[allow(clippy::expect_used)]
        let products: Vec<Product> =
            serde_json::from_str(PRODUCTS_JSON).expect("embedded catalog is valid JSON");
        let by_id = products
            .iter()
            .enumerate()
            .map(|(idx, p)| (p.id, idx))
            .collect();
        Self { products, by_id }
    }

    /// All products in catalog order.
    #[must_use]
    pub fn all(&self) -> &[Product] {
        &self.products
    }

    /// Look up a product by id.
    #[must_use]
    pub fn get(&self, id: ProductId) -> Option<&Product> {
        self.by_id.get(&id).map(|&idx| &self.products[idx])
    }

    /// Distinct categories, in catalog order.
    #[must_use]
    pub fn categories(&self) -> Vec<&str> {
        let mut seen = Vec::new();
        for product in &self.products {
            if !seen.contains(&product.category.as_str()) {
                seen.push(product.category.as_str());
            }
        }
        seen
    }

    /// Products filtered by category (if given) and sorted.
    ///
    /// An unknown category yields an empty list rather than an error.
    #[must_use]
    pub fn list(&self, category: Option<&str>, sort: SortOrder) -> Vec<&Product> {
        let mut products: Vec<&Product> = self
            .products
            .iter()
            .filter(|p| category.is_none_or(|c| p.category == c))
            .collect();

        match sort {
            SortOrder::Featured => {}
            SortOrder::PriceAsc => products.sort_by_key(|p| p.price.amount()),
            SortOrder::PriceDesc => {
                products.sort_by_key(|p| std::cmp::Reverse(p.price.amount()));
            }
            SortOrder::Name => products.sort_by(|a, b| a.name.cmp(&b.name)),
        }

        products
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn embedded_catalog_parses_and_has_unique_ids() {
        let catalog = Catalog::shared();
        assert!(!catalog.all().is_empty());
        assert_eq!(catalog.by_id.len(), catalog.all().len());
    }

    #[test]
    fn lookup_by_id_round_trips() {
        let catalog = Catalog::shared();
        let first = &catalog.all()[0];
        let found = catalog.get(first.id).unwrap();
        assert_eq!(found.name, first.name);
    }

    #[test]
    fn unknown_id_returns_none() {
        assert!(Catalog::shared().get(ProductId::new(999_999)).is_none());
    }

    #[test]
    fn price_ascending_sort_is_monotonic() {
        let products = Catalog::shared().list(None, SortOrder::PriceAsc);
        for pair in products.windows(2) {
            assert!(pair[0].price.amount() <= pair[1].price.amount());
        }
    }

    #[test]
    fn price_descending_sort_is_monotonic() {
        let products = Catalog::shared().list(None, SortOrder::PriceDesc);
        for pair in products.windows(2) {
            assert!(pair[0].price.amount() >= pair[1].price.amount());
        }
    }

    #[test]
    fn unknown_category_yields_empty_list() {
        assert!(
            Catalog::shared()
                .list(Some("sculpture"), SortOrder::Featured)
                .is_empty()
        );
    }

    #[test]
    fn snapshot_carries_price_and_image() {
        let catalog = Catalog::shared();
        let product = &catalog.all()[0];
        let snapshot = product.snapshot();
        assert_eq!(snapshot.price, product.price);
        assert_eq!(snapshot.image, product.image);
    }
}
