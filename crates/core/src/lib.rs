//! PhantomTech Core - Shared cart domain library.
//!
//! This crate provides the types and logic shared by the storefront
//! binary and its tests:
//!
//! - [`types`] - Newtype IDs, currency, and locale-aware price formatting
//! - [`product`] - Read-only product records served by the catalog
//! - [`cart`] - Session-resident cart with line items and running totals
//! - [`security`] - Anti-forgery token derivation and validation
//!
//! # Architecture
//!
//! The core crate contains only types and pure logic - no I/O, no
//! database access, no HTTP. The optional `postgres` feature adds
//! `sqlx` trait impls so the storefront can read these types straight
//! from query rows.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod product;
pub mod security;
pub mod types;

pub use cart::{Cart, LineItem};
pub use product::Product;
pub use types::*;
