//! In-memory catalog backend.
//!
//! Serves a fixed product list from memory. Used by the storefront's
//! integration tests, which drive the full router without a database.

use async_trait::async_trait;
use rust_decimal::Decimal;

use phantomtech_core::types::ProductId;
use phantomtech_core::Product;

use super::products::ProductStore;
use super::RepositoryError;

/// Catalog backed by a plain `Vec<Product>`.
#[derive(Debug, Default)]
pub struct MemoryProductStore {
    products: Vec<Product>,
}

impl MemoryProductStore {
    /// Create a store over a fixed product list.
    #[must_use]
    pub fn new(products: Vec<Product>) -> Self {
        Self { products }
    }
}

#[async_trait]
impl ProductStore for MemoryProductStore {
    async fn find_featured(&self, limit: i64) -> Result<Vec<Product>, RepositoryError> {
        let mut featured: Vec<Product> = self
            .products
            .iter()
            .filter(|p| p.price > Decimal::ZERO)
            .cloned()
            .collect();
        featured.sort_by(|a, b| b.price.cmp(&a.price));
        featured.truncate(usize::try_from(limit).unwrap_or(0));
        Ok(featured)
    }

    async fn find_by_id(&self, id: ProductId) -> Result<Option<Product>, RepositoryError> {
        Ok(self
            .products
            .iter()
            .find(|p| p.product_id == id)
            .cloned())
    }

    async fn ping(&self) -> Result<(), RepositoryError> {
        Ok(())
    }
}
