//! Database access for the storefront `PostgreSQL` instance.
//!
//! ## Tables
//!
//! - `products` - The catalog (id, name, price, display metadata)
//! - `sessions` - Tower-sessions storage
//!
//! Migrations live in `crates/storefront/migrations/` and run at
//! startup via `sqlx::migrate!`.

pub mod memory;
pub mod products;

use std::time::Duration;

use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use thiserror::Error;

pub use memory::MemoryProductStore;
pub use products::{PgProductStore, ProductStore};

/// Errors from repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Underlying database error.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Stored data violated an invariant (e.g. negative price).
    #[error("data corruption: {0}")]
    DataCorruption(String),
}

/// Create a `PostgreSQL` connection pool with sensible defaults.
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(database_url: &secrecy::SecretString) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .min_connections(2)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}
