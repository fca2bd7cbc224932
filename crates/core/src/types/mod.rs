//! Shared type definitions.

pub mod id;
pub mod price;

pub use id::ProductId;
pub use price::{Currency, Locale, UnknownCurrency};
