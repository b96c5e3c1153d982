//! FX engine facade.

use std::sync::Arc;

use chrono::NaiveDate;
use fxrates_common::{CurrencyCode, Money};
use tracing::info;

use crate::cache::{
    CacheStats, HistoricalRateCache, RateCache, SharedHistoricalRateCache, SharedRateCache,
};
use crate::catalog::{Currencies, CurrencyCatalog};
use crate::config::ProviderConfig;
use crate::conversion::{Conversion, Converter};
use crate::current::CurrentRateService;
use crate::error::FxResult;
use crate::historical::HistoricalRateService;
use crate::http::HttpRateProvider;
use crate::period::{PeriodAggregator, RatePeriod};
use crate::provider::RateProvider;

/// Owns the process-wide caches and wires every service to them.
///
/// Construct one per process; the caches live as long as the engine and are
/// never cleared.
pub struct FxEngine {
    provider: Arc<dyn RateProvider>,
    rate_cache: SharedRateCache,
    historical_cache: SharedHistoricalRateCache,
    catalog: CurrencyCatalog,
    current: CurrentRateService,
    historical: HistoricalRateService,
    periods: PeriodAggregator,
    converter: Converter,
}

impl FxEngine {
    /// Create a new FX engine with the given provider.
    pub fn new(provider: Arc<dyn RateProvider>) -> Self {
        let rate_cache = Arc::new(RateCache::new());
        let historical_cache = Arc::new(HistoricalRateCache::new());

        let current = CurrentRateService::new(provider.clone(), rate_cache.clone());
        let historical = HistoricalRateService::new(provider.clone(), historical_cache.clone());

        info!(provider = provider.name(), "FX engine created");

        Self {
            catalog: CurrencyCatalog::new(provider.clone()),
            converter: Converter::new(current.clone()),
            periods: PeriodAggregator::new(historical.clone()),
            current,
            historical,
            provider,
            rate_cache,
            historical_cache,
        }
    }

    /// Create an engine backed by the HTTP provider.
    pub fn from_config(config: ProviderConfig) -> FxResult<Self> {
        let provider = HttpRateProvider::new(config)?;
        Ok(Self::new(Arc::new(provider)))
    }

    pub fn provider_name(&self) -> &str {
        self.provider.name()
    }

    /// Fetch the currency catalog.
    pub async fn currencies(&self) -> FxResult<Currencies> {
        self.catalog.fetch_currencies().await
    }

    /// Get the current rate for `from -> to`; `None` if not offered.
    pub async fn get_rate(&self, from: &CurrencyCode, to: &CurrencyCode) -> FxResult<Option<f64>> {
        self.current.get_rate(from, to).await
    }

    /// Get the rate for `from -> to` published on `date`.
    pub async fn get_historical_rate(
        &self,
        from: &CurrencyCode,
        to: &CurrencyCode,
        date: NaiveDate,
    ) -> FxResult<f64> {
        self.historical.get_rate(from, to, date).await
    }

    /// Get `days` dated rates ending today.
    pub async fn get_period(&self, from: &CurrencyCode, to: &CurrencyCode, days: u32) -> RatePeriod {
        self.periods.get_period(from, to, days).await
    }

    /// Get `days` dated rates ending at `end`.
    pub async fn get_period_ending(
        &self,
        from: &CurrencyCode,
        to: &CurrencyCode,
        days: u32,
        end: NaiveDate,
    ) -> RatePeriod {
        self.periods.get_period_ending(from, to, days, end).await
    }

    /// Convert an amount to another currency.
    pub async fn convert(&self, amount: &Money, to: &CurrencyCode) -> FxResult<Conversion> {
        self.converter.convert(amount, to).await
    }

    /// Get cache statistics.
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            current_entries: self.rate_cache.len(),
            historical_entries: self.historical_cache.len(),
        }
    }
}
