//! HTTP route handlers for the storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET  /             - Product listing (seeds an empty cart)
//! GET  /cart         - Cart page
//! POST /cart         - Add a product to the cart
//! POST /cart/update  - Update line quantities (0 removes)
//! GET  /health       - Liveness check
//! GET  /health/ready - Readiness check (catalog connectivity)
//! ```
//!
//! Both POST routes require a valid anti-forgery `nonce`; failures of
//! any kind degrade to a redirect, never an error page.

pub mod cart;
pub mod home;

use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

/// Create all routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(home::index))
        .route("/cart", get(cart::show).post(cart::add))
        .route("/cart/update", post(cart::update))
}
