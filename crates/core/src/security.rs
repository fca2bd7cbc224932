//! Anti-forgery token derivation and validation.
//!
//! Mutating cart routes require a `nonce` form field holding the
//! SHA-256 digest of the visitor's session id concatenated with their
//! user-agent string. The token is recomputed per request and compared
//! for exact equality, never stored. It invalidates automatically when
//! the session rotates or the user-agent changes; within one
//! session/user-agent pair it is replayable, which is the accepted
//! trade-off of this lightweight session-binding scheme.

use rand::Rng;
use sha2::{Digest, Sha256};

/// Generate a cryptographically random opaque identifier.
///
/// Used as the per-process suffix of the session cookie name to make
/// cookie enumeration across deployments useless.
#[must_use]
pub fn generate_id() -> String {
    let bytes: [u8; 16] = rand::rng().random();
    hex_encode(&bytes)
}

/// Derive the anti-forgery token for a (session id, user-agent) pair.
#[must_use]
pub fn compute_token(session_id: &str, user_agent: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(session_id.as_bytes());
    hasher.update(user_agent.as_bytes());
    hex_encode(&hasher.finalize())
}

/// Check a submitted token against the expected digest.
///
/// Returns `false` for any token that is not exactly the digest of the
/// current session id and user-agent. Never errors.
#[must_use]
pub fn is_valid_token(submitted: &str, session_id: &str, user_agent: &str) -> bool {
    submitted == compute_token(session_id, user_agent)
}

fn hex_encode(bytes: &[u8]) -> String {
    use std::fmt::Write;

    bytes.iter().fold(
        String::with_capacity(bytes.len() * 2),
        |mut out, byte| {
            let _ = write!(out, "{byte:02x}");
            out
        },
    )
}
