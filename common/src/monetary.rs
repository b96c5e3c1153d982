//! Currency codes, pairs and amounts.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Currency code as published by the rate provider (e.g. `usd`).
///
/// Codes are opaque: there is no registry check, any string may be queried.
/// They are stored lowercase and displayed uppercase.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct CurrencyCode(String);

impl CurrencyCode {
    /// Create a new currency code, normalizing it to lowercase.
    pub fn new(code: impl Into<String>) -> Self {
        Self(code.into().trim().to_lowercase())
    }

    /// Get the code as used on the wire.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Get the uppercase display form.
    pub fn to_display(&self) -> String {
        self.0.to_uppercase()
    }

    /// Common currencies
    pub fn usd() -> Self {
        Self::new("usd")
    }

    pub fn eur() -> Self {
        Self::new("eur")
    }

    pub fn brl() -> Self {
        Self::new("brl")
    }

    pub fn gbp() -> Self {
        Self::new("gbp")
    }
}

impl fmt::Display for CurrencyCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_display())
    }
}

impl From<&str> for CurrencyCode {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for CurrencyCode {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

impl From<CurrencyCode> for String {
    fn from(code: CurrencyCode) -> Self {
        code.0
    }
}

/// An ordered `(from, to)` currency combination.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CurrencyPair {
    /// Currency being converted from (the base of a rate table).
    pub from: CurrencyCode,
    /// Currency being converted to.
    pub to: CurrencyCode,
}

impl CurrencyPair {
    /// Create a new currency pair.
    pub fn new(from: impl Into<CurrencyCode>, to: impl Into<CurrencyCode>) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
        }
    }

    /// Get the inverse pair.
    pub fn inverse(&self) -> Self {
        Self {
            from: self.to.clone(),
            to: self.from.clone(),
        }
    }
}

impl fmt::Display for CurrencyPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.from, self.to)
    }
}

/// An amount in a given currency.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Money {
    pub value: f64,
    pub currency: CurrencyCode,
}

impl Money {
    /// Create a new Money instance.
    pub fn new(value: f64, currency: impl Into<CurrencyCode>) -> Self {
        Self {
            value,
            currency: currency.into(),
        }
    }

    /// Check if the amount is finite and strictly positive.
    pub fn is_positive(&self) -> bool {
        self.value.is_finite() && self.value > 0.0
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2} {}", self.value, self.currency)
    }
}
