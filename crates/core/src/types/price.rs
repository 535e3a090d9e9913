//! Type-safe price representation using decimal arithmetic.
//!
//! Prices are stored as [`rust_decimal::Decimal`] amounts and formatted for
//! display only at the boundary. Catalog services deliver prices as display
//! labels (e.g. `"$49.00"`); [`Price::parse_label`] derives the numeric
//! amount by retaining only digits and the decimal point.

use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A price with currency information.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Price {
    /// Amount in the currency's standard unit (e.g., dollars, not cents).
    pub amount: Decimal,
    /// ISO 4217 currency code.
    pub currency_code: CurrencyCode,
}

impl Price {
    /// Create a new price.
    #[must_use]
    pub const fn new(amount: Decimal, currency_code: CurrencyCode) -> Self {
        Self {
            amount,
            currency_code,
        }
    }

    /// Create a price from an amount in the smallest currency unit
    /// (e.g., cents for USD).
    #[must_use]
    pub fn from_cents(cents: i64, currency_code: CurrencyCode) -> Self {
        Self {
            amount: Decimal::new(cents, 2),
            currency_code,
        }
    }

    /// Derive the numeric amount from a display label such as `"$49.00"`.
    ///
    /// Retains only ASCII digits and the decimal point, then parses the
    /// remainder. A label with no parseable amount yields `Decimal::ZERO`
    /// rather than an error, so that totals stay computable even with bad
    /// catalog data. Callers that care can log the zero.
    #[must_use]
    pub fn parse_label(label: &str) -> Decimal {
        let digits: String = label
            .chars()
            .filter(|c| c.is_ascii_digit() || *c == '.')
            .collect();
        Decimal::from_str(&digits).unwrap_or(Decimal::ZERO)
    }

    /// Format for display (e.g., `"$19.99"`).
    #[must_use]
    pub fn display(&self) -> String {
        format!("{}{:.2}", self.currency_code.symbol(), self.amount)
    }
}

/// ISO 4217 currency codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum CurrencyCode {
    #[default]
    USD,
    EUR,
    GBP,
    CAD,
    AUD,
}

impl CurrencyCode {
    /// Currency symbol for display formatting.
    #[must_use]
    pub const fn symbol(&self) -> &'static str {
        match self {
            Self::USD | Self::CAD | Self::AUD => "$",
            Self::EUR => "€",
            Self::GBP => "£",
        }
    }

    /// ISO 4217 alphabetic code.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::USD => "USD",
            Self::EUR => "EUR",
            Self::GBP => "GBP",
            Self::CAD => "CAD",
            Self::AUD => "AUD",
        }
    }
}
