//! FX error types.

use chrono::NaiveDate;
use fxrates_common::CurrencyPair;
use thiserror::Error;

/// Errors that can occur while retrieving or using rates.
#[derive(Debug, Clone, Error)]
pub enum FxError {
    /// Transport failure or non-success HTTP status.
    #[error("Network error: {0}")]
    NetworkError(String),

    /// Response body is not well-formed.
    #[error("Parse error: {0}")]
    ParseError(String),

    /// The dated snapshot does not carry the requested pair, or no snapshot
    /// is published for that date.
    #[error("Rate not available for {pair} on {date}")]
    RateUnavailable { pair: CurrencyPair, date: NaiveDate },

    /// The provider publishes no snapshot for the base on that date.
    #[error("No snapshot for {base} on {date}")]
    SnapshotUnavailable { base: String, date: NaiveDate },

    /// Conversion requested for a pair the provider does not offer.
    #[error("Conversion not available for {0}")]
    ConversionUnavailable(CurrencyPair),

    /// Amount to convert is not a positive number.
    #[error("Invalid amount: {0}")]
    InvalidAmount(f64),
}

impl FxError {
    /// Check if retrying the same request could succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, FxError::NetworkError(_))
    }

    /// Get a stable error code.
    pub fn error_code(&self) -> &'static str {
        match self {
            FxError::NetworkError(_) => "NETWORK_ERROR",
            FxError::ParseError(_) => "PARSE_ERROR",
            FxError::RateUnavailable { .. } => "RATE_UNAVAILABLE",
            FxError::SnapshotUnavailable { .. } => "SNAPSHOT_UNAVAILABLE",
            FxError::ConversionUnavailable(_) => "CONVERSION_UNAVAILABLE",
            FxError::InvalidAmount(_) => "INVALID_AMOUNT",
        }
    }
}

impl From<reqwest::Error> for FxError {
    fn from(err: reqwest::Error) -> Self {
        FxError::NetworkError(err.to_string())
    }
}

impl From<serde_json::Error> for FxError {
    fn from(err: serde_json::Error) -> Self {
        FxError::ParseError(err.to_string())
    }
}

/// Result type for FX operations.
pub type FxResult<T> = Result<T, FxError>;
