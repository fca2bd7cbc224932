//! HTTP middleware stack for the storefront.
//!
//! # Middleware Order (bottom to top in Router)
//!
//! 1. Sentry layers (capture errors, outermost)
//! 2. Session layer (tower-sessions)
//! 3. Security headers

pub mod antiforgery;
pub mod security_headers;
pub mod session;

pub use antiforgery::{issue_token, verify_token};
pub use security_headers::security_headers_middleware;
pub use session::create_session_layer;
