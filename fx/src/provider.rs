//! Rate provider trait and the in-memory test provider.

use async_trait::async_trait;
use chrono::NaiveDate;
use fxrates_common::CurrencyCode;
use std::collections::{BTreeMap, HashMap};

use crate::error::FxResult;

/// Rates from one base currency to every currency the provider offers.
pub type RateTable = HashMap<CurrencyCode, f64>;

/// Currency code to display name, ordered by code.
pub type CurrencyNames = BTreeMap<CurrencyCode, String>;

/// A rate table as published for a base currency.
#[derive(Debug, Clone, PartialEq)]
pub struct RateSnapshot {
    /// Base currency of the table.
    pub base: CurrencyCode,
    /// Publication date reported by the provider, if any.
    pub date: Option<NaiveDate>,
    /// Rates from `base` (1 unit of base = rate units of target).
    pub rates: RateTable,
}

impl RateSnapshot {
    /// Create a snapshot without a publication date.
    pub fn new(base: CurrencyCode, rates: RateTable) -> Self {
        Self {
            base,
            date: None,
            rates,
        }
    }

    /// Set the publication date.
    pub fn with_date(mut self, date: NaiveDate) -> Self {
        self.date = Some(date);
        self
    }

    /// Get the rate to `to`, if the table offers it.
    pub fn rate(&self, to: &CurrencyCode) -> Option<f64> {
        self.rates.get(to).copied()
    }
}

/// Source of currency catalogs and rate tables.
#[async_trait]
pub trait RateProvider: Send + Sync {
    /// Get the provider name.
    fn name(&self) -> &str;

    /// Fetch the catalog of currency codes and display names.
    async fn fetch_currencies(&self) -> FxResult<CurrencyNames>;

    /// Fetch the current rate table for `base`.
    async fn fetch_latest(&self, base: &CurrencyCode) -> FxResult<RateSnapshot>;

    /// Fetch the rate table for `base` as published on `date`.
    async fn fetch_snapshot(&self, base: &CurrencyCode, date: NaiveDate)
        -> FxResult<RateSnapshot>;
}

#[cfg(any(test, feature = "test-utils"))]
pub use mock::MockRateProvider;

#[cfg(any(test, feature = "test-utils"))]
mod mock {
    use super::*;
    use crate::error::FxError;
    use dashmap::DashMap;
    use parking_lot::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    /// In-memory provider for tests.
    ///
    /// Counts every fetch and can be told to fail specific requests.
    #[derive(Default)]
    pub struct MockRateProvider {
        currencies: Mutex<CurrencyNames>,
        latest: DashMap<CurrencyCode, RateTable>,
        snapshots: DashMap<(CurrencyCode, NaiveDate), RateTable>,
        latest_failure: Mutex<Option<FxError>>,
        snapshot_failures: DashMap<NaiveDate, FxError>,
        delay: Mutex<Option<Duration>>,
        currency_fetches: AtomicUsize,
        latest_fetches: AtomicUsize,
        snapshot_fetches: DashMap<NaiveDate, usize>,
        in_flight: AtomicUsize,
        max_in_flight: AtomicUsize,
    }

    impl MockRateProvider {
        /// Create an empty mock provider.
        pub fn new() -> Self {
            Self::default()
        }

        /// Add a catalog entry.
        pub fn set_currency(&self, code: &str, name: &str) {
            self.currencies
                .lock()
                .insert(CurrencyCode::new(code), name.to_string());
        }

        /// Set the current table for `base`.
        pub fn set_latest(&self, base: &str, rates: &[(&str, f64)]) {
            self.latest.insert(CurrencyCode::new(base), table(rates));
        }

        /// Set the table for `base` on `date`.
        pub fn set_snapshot(&self, base: &str, date: NaiveDate, rates: &[(&str, f64)]) {
            self.snapshots
                .insert((CurrencyCode::new(base), date), table(rates));
        }

        /// Make every current-rate and catalog fetch fail with `error`.
        pub fn fail_latest(&self, error: FxError) {
            *self.latest_failure.lock() = Some(error);
        }

        /// Make dated fetches for `date` fail with `error`.
        pub fn fail_snapshot(&self, date: NaiveDate, error: FxError) {
            self.snapshot_failures.insert(date, error);
        }

        /// Hold every dated fetch for `delay` before answering.
        pub fn set_delay(&self, delay: Duration) {
            *self.delay.lock() = Some(delay);
        }

        pub fn currency_fetches(&self) -> usize {
            self.currency_fetches.load(Ordering::SeqCst)
        }

        pub fn latest_fetches(&self) -> usize {
            self.latest_fetches.load(Ordering::SeqCst)
        }

        /// Dated fetches issued for `date`.
        pub fn snapshot_fetches_for(&self, date: NaiveDate) -> usize {
            self.snapshot_fetches.get(&date).map(|c| *c).unwrap_or(0)
        }

        /// Dated fetches issued across all dates.
        pub fn snapshot_fetches(&self) -> usize {
            self.snapshot_fetches.iter().map(|c| *c.value()).sum()
        }

        /// Highest number of dated fetches that were running at once.
        pub fn max_in_flight(&self) -> usize {
            self.max_in_flight.load(Ordering::SeqCst)
        }
    }

    fn table(rates: &[(&str, f64)]) -> RateTable {
        rates
            .iter()
            .map(|(code, rate)| (CurrencyCode::new(*code), *rate))
            .collect()
    }

    #[async_trait]
    impl RateProvider for MockRateProvider {
        fn name(&self) -> &str {
            "MOCK"
        }

        async fn fetch_currencies(&self) -> FxResult<CurrencyNames> {
            self.currency_fetches.fetch_add(1, Ordering::SeqCst);
            if let Some(error) = self.latest_failure.lock().clone() {
                return Err(error);
            }
            Ok(self.currencies.lock().clone())
        }

        async fn fetch_latest(&self, base: &CurrencyCode) -> FxResult<RateSnapshot> {
            self.latest_fetches.fetch_add(1, Ordering::SeqCst);
            if let Some(error) = self.latest_failure.lock().clone() {
                return Err(error);
            }
            self.latest
                .get(base)
                .map(|rates| RateSnapshot::new(base.clone(), rates.value().clone()))
                .ok_or_else(|| FxError::NetworkError("HTTP 404 Not Found".to_string()))
        }

        async fn fetch_snapshot(
            &self,
            base: &CurrencyCode,
            date: NaiveDate,
        ) -> FxResult<RateSnapshot> {
            *self.snapshot_fetches.entry(date).or_insert(0) += 1;

            let running = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            self.max_in_flight.fetch_max(running, Ordering::SeqCst);
            let delay = *self.delay.lock();
            if let Some(delay) = delay {
                tokio::time::sleep(delay).await;
            }
            self.in_flight.fetch_sub(1, Ordering::SeqCst);

            if let Some(error) = self.snapshot_failures.get(&date) {
                return Err(error.value().clone());
            }
            self.snapshots
                .get(&(base.clone(), date))
                .map(|rates| RateSnapshot::new(base.clone(), rates.value().clone()).with_date(date))
                .ok_or_else(|| FxError::SnapshotUnavailable {
                    base: base.as_str().to_string(),
                    date,
                })
        }
    }
}
