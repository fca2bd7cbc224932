//! Currency and locale-aware price formatting.
//!
//! All monetary amounts are `rust_decimal::Decimal` in the currency's
//! standard unit (dollars, not cents). Display formatting always
//! renders two fractional digits with the currency symbol.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// ISO 4217 currency codes supported by the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Currency {
    #[default]
    USD,
    EUR,
    GBP,
    CAD,
    AUD,
}

/// Error returned when a currency code is not recognized.
#[derive(Debug, Error)]
#[error("unknown currency code: {0}")]
pub struct UnknownCurrency(pub String);

impl Currency {
    /// Display symbol used when formatting prices.
    #[must_use]
    pub const fn symbol(self) -> &'static str {
        match self {
            Self::USD | Self::CAD | Self::AUD => "$",
            Self::EUR => "\u{20ac}",
            Self::GBP => "\u{a3}",
        }
    }

    /// ISO 4217 code.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::USD => "USD",
            Self::EUR => "EUR",
            Self::GBP => "GBP",
            Self::CAD => "CAD",
            Self::AUD => "AUD",
        }
    }

    /// Parse an ISO 4217 code (case-insensitive).
    ///
    /// # Errors
    ///
    /// Returns [`UnknownCurrency`] for codes the store does not support.
    pub fn from_code(code: &str) -> Result<Self, UnknownCurrency> {
        match code.to_ascii_uppercase().as_str() {
            "USD" => Ok(Self::USD),
            "EUR" => Ok(Self::EUR),
            "GBP" => Ok(Self::GBP),
            "CAD" => Ok(Self::CAD),
            "AUD" => Ok(Self::AUD),
            other => Err(UnknownCurrency(other.to_string())),
        }
    }
}

/// Display locale for price formatting.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Locale {
    /// BCP 47 language tag (e.g. "en-US"). Carried through for
    /// templates; symbol placement does not vary by language here.
    pub lang: String,
    /// Currency used for all prices in the store.
    pub currency: Currency,
}

impl Locale {
    /// Create a locale from a language tag and currency.
    #[must_use]
    pub fn new(lang: impl Into<String>, currency: Currency) -> Self {
        Self {
            lang: lang.into(),
            currency,
        }
    }

    /// Format an amount as a currency string (e.g. "$19.98").
    #[must_use]
    pub fn format(&self, amount: Decimal) -> String {
        format!("{}{:.2}", self.currency.symbol(), amount)
    }
}

impl Default for Locale {
    fn default() -> Self {
        Self::new("en-US", Currency::USD)
    }
}
