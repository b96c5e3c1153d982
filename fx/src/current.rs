//! Current-rate lookups with full-table cache population.

use std::sync::Arc;

use fxrates_common::CurrencyCode;
use tracing::{debug, instrument};

use crate::cache::{RateCache, SharedRateCache};
use crate::error::FxResult;
use crate::provider::RateProvider;

/// Answers single-pair current-rate queries.
///
/// A miss fetches the whole table for `from`, which warms the cache for
/// every currency the provider offers against `from`, in both directions.
#[derive(Clone)]
pub struct CurrentRateService {
    provider: Arc<dyn RateProvider>,
    cache: SharedRateCache,
}

impl CurrentRateService {
    pub fn new(provider: Arc<dyn RateProvider>, cache: SharedRateCache) -> Self {
        Self { provider, cache }
    }

    /// Get the rate for `from -> to`.
    ///
    /// Returns `Ok(None)` when the provider's table for `from` does not offer
    /// `to`. Fetch failures leave the cache unchanged.
    #[instrument(skip(self), fields(provider = self.provider.name()))]
    pub async fn get_rate(&self, from: &CurrencyCode, to: &CurrencyCode) -> FxResult<Option<f64>> {
        if let Some(rate) = self.cache.get(from, to) {
            return Ok(Some(rate));
        }

        let snapshot = self.provider.fetch_latest(from).await?;
        self.cache.put_table(from, &snapshot.rates);

        let rate = snapshot.rate(to);
        if rate.is_none() {
            debug!("Pair not offered by provider");
        }
        Ok(rate)
    }

    pub fn cache(&self) -> &RateCache {
        &self.cache
    }
}
