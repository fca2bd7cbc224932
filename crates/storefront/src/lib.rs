//! PhantomTech Storefront library.
//!
//! Exposes the storefront as a library so the router can be exercised
//! in-process by the integration tests.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod routes;
pub mod state;
