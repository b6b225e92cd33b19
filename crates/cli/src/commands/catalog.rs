//! Catalog inspection commands.
//!
//! The catalog ships inside the storefront binary; these commands give a
//! pre-deploy sanity check without starting the server.

use std::collections::HashSet;

use thiserror::Error;

use aroura_core::Price;
use aroura_storefront::catalog::Catalog;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("duplicate product id: {0}")]
    DuplicateId(i64),

    #[error("product {0} has a non-positive price")]
    NonPositivePrice(i64),

    #[error("product {0} has an empty name")]
    EmptyName(i64),
}

/// Validate the embedded catalog.
///
/// # Errors
///
/// Returns the first defect found.
pub fn check() -> Result<(), CatalogError> {
    let catalog = Catalog::shared();
    let mut seen = HashSet::new();

    for product in catalog.all() {
        let raw_id = product.id.as_i64();
        if !seen.insert(product.id) {
            return Err(CatalogError::DuplicateId(raw_id));
        }
        if product.price <= Price::ZERO {
            return Err(CatalogError::NonPositivePrice(raw_id));
        }
        if product.name.trim().is_empty() {
            return Err(CatalogError::EmptyName(raw_id));
        }
    }

    tracing::info!(products = catalog.all().len(), "catalog is valid");
    Ok(())
}

/// Print the catalog as a table.
pub fn list() {
    #[allow(clippy::print_stdout)]
    {
        println!("{:>4}  {:<28} {:<10} {:>12}", "id", "name", "category", "price");
        for product in Catalog::shared().all() {
            println!(
                "{:>4}  {:<28} {:<10} {:>12}",
                product.id.as_i64(),
                product.name,
                product.category,
                product.price.display()
            );
        }
    }
}
