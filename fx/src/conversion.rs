//! Currency conversion on top of current rates.

use fxrates_common::{CurrencyCode, CurrencyPair, Money};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

use crate::current::CurrentRateService;
use crate::error::{FxError, FxResult};

/// Represents a completed currency conversion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Conversion {
    /// Input amount.
    pub input: Money,
    /// Output amount.
    pub output: Money,
    /// Rate used (1 unit of input currency = rate units of output currency).
    pub rate: f64,
}

impl Conversion {
    /// Create a conversion of `input` at `rate` into `to`.
    pub fn new(input: Money, to: CurrencyCode, rate: f64) -> Self {
        let output = Money::new(input.value * rate, to);
        Self {
            input,
            output,
            rate,
        }
    }

    /// Get the currency pair.
    pub fn pair(&self) -> CurrencyPair {
        CurrencyPair::new(self.input.currency.clone(), self.output.currency.clone())
    }
}

/// Converts amounts using [`CurrentRateService`].
#[derive(Clone)]
pub struct Converter {
    rates: CurrentRateService,
}

impl Converter {
    pub fn new(rates: CurrentRateService) -> Self {
        Self { rates }
    }

    /// Convert `amount` into `to`.
    ///
    /// The amount is checked before any fetch. A pair the provider does not
    /// offer is reported as [`FxError::ConversionUnavailable`].
    #[instrument(skip(self, amount), fields(amount = %amount))]
    pub async fn convert(&self, amount: &Money, to: &CurrencyCode) -> FxResult<Conversion> {
        if !amount.is_positive() {
            return Err(FxError::InvalidAmount(amount.value));
        }

        let rate = self
            .rates
            .get_rate(&amount.currency, to)
            .await?
            .ok_or_else(|| {
                FxError::ConversionUnavailable(CurrencyPair::new(
                    amount.currency.clone(),
                    to.clone(),
                ))
            })?;

        let conversion = Conversion::new(amount.clone(), to.clone(), rate);

        info!(
            pair = %conversion.pair(),
            rate = conversion.rate,
            output = %conversion.output,
            "Conversion completed"
        );

        Ok(conversion)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::RateCache;
    use crate::provider::MockRateProvider;
    use std::sync::Arc;

    fn setup() -> (Arc<MockRateProvider>, Converter) {
        let provider = Arc::new(MockRateProvider::new());
        provider.set_latest("brl", &[("usd", 0.2), ("eur", 0.18)]);
        let rates = CurrentRateService::new(provider.clone(), Arc::new(RateCache::new()));
        (provider, Converter::new(rates))
    }

    #[tokio::test]
    async fn test_convert() {
        let (_, converter) = setup();

        let conversion = converter
            .convert(&Money::new(100.0, "brl"), &CurrencyCode::usd())
            .await
            .unwrap();

        assert_eq!(conversion.rate, 0.2);
        assert_eq!(conversion.output.currency, CurrencyCode::usd());
        assert!((conversion.output.value - 20.0).abs() < 1e-9);
        assert_eq!(conversion.pair(), CurrencyPair::new("brl", "usd"));
    }

    #[tokio::test]
    async fn test_invalid_amount_skips_fetch() {
        let (provider, converter) = setup();

        for value in [0.0, -5.0, f64::NAN] {
            let result = converter
                .convert(&Money::new(value, "brl"), &CurrencyCode::usd())
                .await;
            assert!(matches!(result, Err(FxError::InvalidAmount(_))));
        }

        assert_eq!(provider.latest_fetches(), 0);
    }

    #[tokio::test]
    async fn test_unavailable_pair() {
        let (_, converter) = setup();

        let result = converter
            .convert(&Money::new(10.0, "brl"), &CurrencyCode::new("xyz"))
            .await;

        assert!(matches!(result, Err(FxError::ConversionUnavailable(_))));
    }

    #[tokio::test]
    async fn test_convert_through_inverse() {
        let (provider, converter) = setup();
        converter
            .convert(&Money::new(1.0, "brl"), &CurrencyCode::usd())
            .await
            .unwrap();

        // usd -> brl comes from the inverse written by the brl table
        let conversion = converter
            .convert(&Money::new(2.0, "usd"), &CurrencyCode::brl())
            .await
            .unwrap();

        assert!((conversion.output.value - 10.0).abs() < 1e-9);
        assert_eq!(provider.latest_fetches(), 1);
    }
}
