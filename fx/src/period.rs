//! Multi-day historical series with per-date failure isolation.

use chrono::NaiveDate;
use futures::future::join_all;
use fxrates_common::{today, trailing_days, CurrencyCode, CurrencyPair};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument, warn};

use crate::historical::HistoricalRateService;

/// Outcome of one date in a period: a rate, or the reason there is none.
///
/// `rate` is `None` exactly when `error` is set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DateRecord {
    pub date: NaiveDate,
    #[serde(rename = "taxa")]
    pub rate: Option<f64>,
    #[serde(rename = "erro", default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl DateRecord {
    pub fn ok(date: NaiveDate, rate: f64) -> Self {
        Self {
            date,
            rate: Some(rate),
            error: None,
        }
    }

    pub fn failed(date: NaiveDate, message: impl Into<String>) -> Self {
        let mut message = message.into();
        if message.is_empty() {
            message = "unknown error".to_string();
        }
        Self {
            date,
            rate: None,
            error: Some(message),
        }
    }

    pub fn is_ok(&self) -> bool {
        self.rate.is_some()
    }
}

/// Dated rates for a pair, newest first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RatePeriod {
    pub pair: CurrencyPair,
    pub records: Vec<DateRecord>,
}

impl RatePeriod {
    /// Check if any date could not be loaded.
    pub fn has_errors(&self) -> bool {
        self.records.iter().any(|r| !r.is_ok())
    }

    /// Get the dates that could not be loaded.
    pub fn failed(&self) -> impl Iterator<Item = &DateRecord> {
        self.records.iter().filter(|r| !r.is_ok())
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Builds historical series by fanning out one task per date.
#[derive(Clone)]
pub struct PeriodAggregator {
    historical: HistoricalRateService,
}

impl PeriodAggregator {
    pub fn new(historical: HistoricalRateService) -> Self {
        Self { historical }
    }

    /// Get `days` dated rates ending today (UTC).
    pub async fn get_period(&self, from: &CurrencyCode, to: &CurrencyCode, days: u32) -> RatePeriod {
        self.get_period_ending(from, to, days, today()).await
    }

    /// Get `days` dated rates ending at `end`: `end, end - 1, ...`.
    ///
    /// Never fails as a whole. Each date is fetched exactly once, in its own
    /// task; a failed or panicked task becomes a failed [`DateRecord`] and
    /// does not affect the other dates.
    #[instrument(skip(self))]
    pub async fn get_period_ending(
        &self,
        from: &CurrencyCode,
        to: &CurrencyCode,
        days: u32,
        end: NaiveDate,
    ) -> RatePeriod {
        let dates = trailing_days(end, days);

        let tasks = dates.iter().map(|&date| {
            let service = self.historical.clone();
            let from = from.clone();
            let to = to.clone();
            tokio::spawn(async move { service.get_rate(&from, &to, date).await })
        });
        let outcomes = join_all(tasks).await;

        let records: Vec<DateRecord> = dates
            .into_iter()
            .zip(outcomes)
            .map(|(date, outcome)| match outcome {
                Ok(Ok(rate)) => DateRecord::ok(date, rate),
                Ok(Err(e)) => {
                    warn!(date = %date, error = %e, "Failed to load dated rate");
                    DateRecord::failed(date, e.to_string())
                }
                Err(e) => {
                    warn!(date = %date, error = %e, "Dated rate task failed");
                    DateRecord::failed(date, format!("task failed: {}", e))
                }
            })
            .collect();

        let period = RatePeriod {
            pair: CurrencyPair::new(from.clone(), to.clone()),
            records,
        };

        info!(
            days = period.len(),
            failed = period.failed().count(),
            "Period assembled"
        );
        period
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::HistoricalRateCache;
    use crate::error::FxError;
    use crate::provider::MockRateProvider;
    use fxrates_common::iso_date;
    use std::sync::Arc;
    use std::time::Duration;

    fn end() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 6).unwrap()
    }

    fn setup(end: NaiveDate, days: u32) -> (Arc<MockRateProvider>, PeriodAggregator) {
        let provider = Arc::new(MockRateProvider::new());
        for (i, date) in trailing_days(end, days).into_iter().enumerate() {
            provider.set_snapshot("usd", date, &[("brl", 5.0 + i as f64)]);
        }
        let historical =
            HistoricalRateService::new(provider.clone(), Arc::new(HistoricalRateCache::new()));
        (provider, PeriodAggregator::new(historical))
    }

    #[tokio::test]
    async fn test_period_length_and_order_from_today() {
        let end = today();
        let (_, aggregator) = setup(end, 7);

        let period = aggregator
            .get_period(&CurrencyCode::usd(), &CurrencyCode::brl(), 7)
            .await;
        assert_eq!(period.len(), 7);

        // A run that crosses midnight UTC shifts the window by one day
        if period.records[0].date != end {
            return;
        }

        let expected: Vec<String> = trailing_days(end, 7).into_iter().map(iso_date).collect();
        let dates: Vec<String> = period.records.iter().map(|r| iso_date(r.date)).collect();
        assert_eq!(dates, expected);
        assert!(!period.has_errors());
    }

    #[tokio::test]
    async fn test_records_follow_date_order() {
        let (_, aggregator) = setup(end(), 3);

        let period = aggregator
            .get_period_ending(&CurrencyCode::usd(), &CurrencyCode::brl(), 3, end())
            .await;

        let rates: Vec<Option<f64>> = period.records.iter().map(|r| r.rate).collect();
        assert_eq!(rates, vec![Some(5.0), Some(6.0), Some(7.0)]);
        assert_eq!(period.records[2].date, NaiveDate::from_ymd_opt(2024, 3, 4).unwrap());
    }

    #[tokio::test]
    async fn test_partial_failure_is_isolated() {
        let (provider, aggregator) = setup(end(), 7);
        let failing = end() - chrono::Duration::days(3);
        provider.fail_snapshot(failing, FxError::NetworkError("HTTP 503".to_string()));

        let period = aggregator
            .get_period_ending(&CurrencyCode::usd(), &CurrencyCode::brl(), 7, end())
            .await;

        assert_eq!(period.len(), 7);
        assert!(period.has_errors());
        for record in &period.records {
            if record.date == failing {
                assert_eq!(record.rate, None);
                assert!(!record.error.as_deref().unwrap().is_empty());
            } else {
                assert!(record.rate.is_some());
                assert!(record.error.is_none());
            }
        }
        // No retries
        assert_eq!(provider.snapshot_fetches_for(failing), 1);
    }

    #[tokio::test]
    async fn test_unpublished_dates_are_recorded() {
        let (_, aggregator) = setup(end(), 2);

        let period = aggregator
            .get_period_ending(&CurrencyCode::usd(), &CurrencyCode::brl(), 4, end())
            .await;

        assert_eq!(period.len(), 4);
        assert_eq!(period.failed().count(), 2);
        assert!(period.records[3]
            .error
            .as_deref()
            .unwrap()
            .contains("Rate not available"));
    }

    #[tokio::test]
    async fn test_overlapping_periods_reuse_cache() {
        let (provider, aggregator) = setup(end(), 5);
        let usd = CurrencyCode::usd();
        let brl = CurrencyCode::brl();

        aggregator.get_period_ending(&usd, &brl, 3, end()).await;
        aggregator.get_period_ending(&usd, &brl, 5, end()).await;

        for date in trailing_days(end(), 5) {
            assert_eq!(provider.snapshot_fetches_for(date), 1);
        }
    }

    #[tokio::test]
    async fn test_dates_are_fetched_concurrently() {
        let (provider, aggregator) = setup(end(), 7);
        provider.set_delay(Duration::from_millis(20));

        aggregator
            .get_period_ending(&CurrencyCode::usd(), &CurrencyCode::brl(), 7, end())
            .await;

        assert_eq!(provider.max_in_flight(), 7);
    }

    #[tokio::test]
    async fn test_zero_days_is_empty() {
        let (provider, aggregator) = setup(end(), 1);

        let period = aggregator
            .get_period_ending(&CurrencyCode::usd(), &CurrencyCode::brl(), 0, end())
            .await;

        assert!(period.is_empty());
        assert_eq!(provider.snapshot_fetches(), 0);
    }

    #[test]
    fn test_date_record_json() {
        let ok = DateRecord::ok(end(), 4.95);
        let failed = DateRecord::failed(end(), "");

        assert_eq!(
            serde_json::to_string(&ok).unwrap(),
            r#"{"date":"2024-03-06","taxa":4.95}"#
        );
        assert_eq!(
            serde_json::to_string(&failed).unwrap(),
            r#"{"date":"2024-03-06","taxa":null,"erro":"unknown error"}"#
        );
    }
}
