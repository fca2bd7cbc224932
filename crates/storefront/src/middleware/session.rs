//! Session middleware configuration.
//!
//! Sessions hold the visitor's cart. The layer is generic over the
//! backing [`SessionStore`]: production uses the `PostgreSQL` store,
//! tests use `tower_sessions::MemoryStore`.

use tower_sessions::{Expiry, SessionManagerLayer, SessionStore};

use phantomtech_core::security;

use crate::config::StoreConfig;

/// Session expiry time in seconds (7 days of inactivity).
const SESSION_EXPIRY_SECONDS: i64 = 7 * 24 * 60 * 60;

/// Session key under which the cart is stored.
pub const CART_KEY: &str = "cart";

/// Create the session layer over the given store.
///
/// The cookie name is the configured prefix plus a random per-process
/// suffix, so the cookie namespace differs across deployments.
#[must_use]
pub fn create_session_layer<S: SessionStore>(
    store: S,
    config: &StoreConfig,
) -> SessionManagerLayer<S> {
    let cookie_name = format!("{}-{}", config.session_cookie, security::generate_id());

    // Secure cookies only make sense behind HTTPS
    let is_secure = config.base_url.starts_with("https://");

    SessionManagerLayer::new(store)
        .with_name(cookie_name)
        .with_expiry(Expiry::OnInactivity(
            tower_sessions::cookie::time::Duration::seconds(SESSION_EXPIRY_SECONDS),
        ))
        .with_secure(is_secure)
        .with_same_site(tower_sessions::cookie::SameSite::Lax)
        .with_http_only(true)
        .with_path("/")
}
