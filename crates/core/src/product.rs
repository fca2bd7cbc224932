//! Product records served by the catalog.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::types::ProductId;

/// A catalog product.
///
/// Read-only to the cart core: products are loaded by the storefront's
/// product store and never mutated here. `price` is non-negative and in
/// the store currency's standard unit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "postgres", derive(sqlx::FromRow))]
pub struct Product {
    pub product_id: ProductId,
    pub name: String,
    pub price: Decimal,
    pub description: Option<String>,
    pub image: Option<String>,
}
