//! Product catalog access.
//!
//! The storefront consumes the catalog through the [`ProductStore`]
//! trait so handlers stay independent of the backend: production uses
//! [`PgProductStore`] over the shared pool, tests use the in-memory
//! store from [`super::memory`].

use async_trait::async_trait;
use sqlx::PgPool;

use phantomtech_core::types::ProductId;
use phantomtech_core::Product;

use super::RepositoryError;

/// Read-only product lookup used by the route handlers.
#[async_trait]
pub trait ProductStore: Send + Sync {
    /// Fetch up to `limit` products with a positive price, sorted by
    /// price descending.
    async fn find_featured(&self, limit: i64) -> Result<Vec<Product>, RepositoryError>;

    /// Fetch a single product by id, `None` when it does not exist.
    async fn find_by_id(&self, id: ProductId) -> Result<Option<Product>, RepositoryError>;

    /// Cheap connectivity check for the readiness endpoint.
    async fn ping(&self) -> Result<(), RepositoryError>;
}

/// `PostgreSQL`-backed catalog.
pub struct PgProductStore {
    pool: PgPool,
}

impl PgProductStore {
    /// Create a store over an existing connection pool.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Access the underlying pool.
    #[must_use]
    pub const fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl ProductStore for PgProductStore {
    async fn find_featured(&self, limit: i64) -> Result<Vec<Product>, RepositoryError> {
        let products = sqlx::query_as::<_, Product>(
            r"
            SELECT product_id, name, price, description, image
            FROM products
            WHERE price > 0
            ORDER BY price DESC
            LIMIT $1
            ",
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(products)
    }

    async fn find_by_id(&self, id: ProductId) -> Result<Option<Product>, RepositoryError> {
        let product = sqlx::query_as::<_, Product>(
            r"
            SELECT product_id, name, price, description, image
            FROM products
            WHERE product_id = $1
            ",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(product)
    }

    async fn ping(&self) -> Result<(), RepositoryError> {
        sqlx::query("SELECT 1").fetch_one(&self.pool).await?;
        Ok(())
    }
}
