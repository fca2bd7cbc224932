//! Anti-forgery guard for mutating cart routes.
//!
//! Every rendered form carries a hidden `nonce` field bound to the
//! visitor's session id and user-agent. Both mutating routes call
//! [`verify_token`] before touching the cart, so the check lives in
//! exactly one place.

use axum::http::{header, HeaderMap};
use tower_sessions::Session;

use phantomtech_core::security;

use crate::error::{AppError, Result};

/// Issue a fresh token for embedding in a form.
///
/// A brand-new session has no id until it is persisted, so the session
/// is saved first when needed; the surrounding layer then sets the
/// cookie on the response.
///
/// # Errors
///
/// Returns `AppError::Session` if persisting the new session fails.
pub async fn issue_token(session: &Session, headers: &HeaderMap) -> Result<String> {
    if session.id().is_none() {
        session.save().await?;
    }

    let session_id = session
        .id()
        .ok_or_else(|| AppError::Internal("session id missing after save".to_string()))?;

    Ok(security::compute_token(
        &session_id.to_string(),
        user_agent(headers),
    ))
}

/// Check a submitted token against the current session and user-agent.
///
/// Returns `false` for sessions that were never persisted (no token
/// could have been issued for them).
#[must_use]
pub fn verify_token(session: &Session, headers: &HeaderMap, submitted: &str) -> bool {
    session.id().is_some_and(|session_id| {
        security::is_valid_token(submitted, &session_id.to_string(), user_agent(headers))
    })
}

fn user_agent(headers: &HeaderMap) -> &str {
    headers
        .get(header::USER_AGENT)
        .and_then(|value| value.to_str().ok())
        .unwrap_or("")
}
