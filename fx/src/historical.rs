//! Dated rate lookups.

use std::sync::Arc;

use chrono::NaiveDate;
use fxrates_common::{CurrencyCode, CurrencyPair};
use tracing::{debug, instrument};

use crate::cache::{HistoricalRateCache, SharedHistoricalRateCache};
use crate::error::{FxError, FxResult};
use crate::provider::RateProvider;

/// Answers `(from, to, date)` queries, caching only the requested pair.
#[derive(Clone)]
pub struct HistoricalRateService {
    provider: Arc<dyn RateProvider>,
    cache: SharedHistoricalRateCache,
}

impl HistoricalRateService {
    pub fn new(provider: Arc<dyn RateProvider>, cache: SharedHistoricalRateCache) -> Self {
        Self { provider, cache }
    }

    /// Get the rate for `from -> to` as published on `date`.
    ///
    /// Fails with [`FxError::RateUnavailable`] when the snapshot lacks the
    /// pair or no snapshot is published for that date.
    #[instrument(skip(self))]
    pub async fn get_rate(
        &self,
        from: &CurrencyCode,
        to: &CurrencyCode,
        date: NaiveDate,
    ) -> FxResult<f64> {
        let pair = CurrencyPair::new(from.clone(), to.clone());

        if let Some(rate) = self.cache.get(&pair, date) {
            return Ok(rate);
        }

        let snapshot = match self.provider.fetch_snapshot(from, date).await {
            Ok(snapshot) => snapshot,
            Err(FxError::SnapshotUnavailable { .. }) => {
                return Err(FxError::RateUnavailable { pair, date })
            }
            Err(e) => return Err(e),
        };

        if let Some(published) = snapshot.date.filter(|published| *published != date) {
            debug!(published = %published, "Provider served a table published on another date");
        }

        let rate = snapshot
            .rate(to)
            .ok_or_else(|| FxError::RateUnavailable {
                pair: pair.clone(),
                date,
            })?;

        self.cache.insert(pair, date, rate);
        Ok(rate)
    }

    pub fn cache(&self) -> &HistoricalRateCache {
        &self.cache
    }
}
