//! In-memory rate caches.
//!
//! Both caches are append-only: entries are never evicted and stay valid for
//! the lifetime of the process. Writes are last-write-wins.

use chrono::NaiveDate;
use dashmap::DashMap;
use fxrates_common::{CurrencyCode, CurrencyPair};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, warn};

use crate::provider::RateTable;

/// Bidirectional cache of current rates keyed by `(from, to)`.
///
/// Every forward rate is stored together with its inverse under one write
/// lock, so a reader never sees one without the other.
#[derive(Debug, Default)]
pub struct RateCache {
    rates: RwLock<HashMap<CurrencyPair, f64>>,
}

impl RateCache {
    /// Create an empty rate cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the cached rate for `from -> to`.
    pub fn get(&self, from: &CurrencyCode, to: &CurrencyCode) -> Option<f64> {
        let pair = CurrencyPair::new(from.clone(), to.clone());
        let rate = self.rates.read().get(&pair).copied();

        match rate {
            Some(_) => debug!(pair = %pair, "Cache hit"),
            None => debug!(pair = %pair, "Cache miss"),
        }
        rate
    }

    /// Store a full table for `from`, writing `from -> target = rate` and
    /// `target -> from = 1 / rate` for every entry.
    ///
    /// Entries whose rate is not finite and strictly positive are skipped.
    /// Returns the number of table entries stored.
    pub fn put_table(&self, from: &CurrencyCode, table: &RateTable) -> usize {
        let mut rates = self.rates.write();
        let mut stored = 0;

        for (target, rate) in table {
            if !rate.is_finite() || *rate <= 0.0 {
                warn!(from = %from, to = %target, rate = *rate, "Skipping invalid rate");
                continue;
            }

            rates.insert(CurrencyPair::new(from.clone(), target.clone()), *rate);
            rates.insert(CurrencyPair::new(target.clone(), from.clone()), 1.0 / rate);
            stored += 1;
        }

        debug!(from = %from, stored, "Cached rate table");
        stored
    }

    /// Get the number of entries in cache.
    pub fn len(&self) -> usize {
        self.rates.read().len()
    }

    /// Check if cache is empty.
    pub fn is_empty(&self) -> bool {
        self.rates.read().is_empty()
    }
}

/// Cache of dated rates keyed by `(from, to, date)`.
///
/// Only the requested pair is stored; no inverse is derived.
#[derive(Debug, Default)]
pub struct HistoricalRateCache {
    rates: DashMap<(CurrencyPair, NaiveDate), f64>,
}

impl HistoricalRateCache {
    /// Create an empty historical cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the cached rate for `pair` on `date`.
    pub fn get(&self, pair: &CurrencyPair, date: NaiveDate) -> Option<f64> {
        let rate = self.rates.get(&(pair.clone(), date)).map(|r| *r);

        match rate {
            Some(_) => debug!(pair = %pair, date = %date, "Historical cache hit"),
            None => debug!(pair = %pair, date = %date, "Historical cache miss"),
        }
        rate
    }

    /// Store the rate for `pair` on `date`.
    pub fn insert(&self, pair: CurrencyPair, date: NaiveDate, rate: f64) {
        self.rates.insert((pair, date), rate);
    }

    pub fn len(&self) -> usize {
        self.rates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rates.is_empty()
    }
}

/// Cache statistics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheStats {
    pub current_entries: usize,
    pub historical_entries: usize,
}

/// Shared rate cache.
pub type SharedRateCache = Arc<RateCache>;

/// Shared historical rate cache.
pub type SharedHistoricalRateCache = Arc<HistoricalRateCache>;

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn table(rates: &[(&str, f64)]) -> RateTable {
        rates
            .iter()
            .map(|(code, rate)| (CurrencyCode::new(*code), *rate))
            .collect()
    }

    #[test]
    fn test_put_table_writes_inverse() {
        let cache = RateCache::new();
        let usd = CurrencyCode::usd();

        let stored = cache.put_table(&usd, &table(&[("brl", 5.0), ("eur", 0.8)]));

        assert_eq!(stored, 2);
        assert_eq!(cache.len(), 4);
        assert_eq!(cache.get(&usd, &CurrencyCode::brl()), Some(5.0));
        assert_eq!(cache.get(&CurrencyCode::brl(), &usd), Some(0.2));
        assert_eq!(cache.get(&CurrencyCode::eur(), &usd), Some(1.25));
    }

    #[test]
    fn test_cache_miss() {
        let cache = RateCache::new();

        assert!(cache.is_empty());
        assert!(cache.get(&CurrencyCode::usd(), &CurrencyCode::eur()).is_none());
    }

    #[test]
    fn test_put_table_last_write_wins() {
        let cache = RateCache::new();
        let usd = CurrencyCode::usd();
        let brl = CurrencyCode::brl();

        cache.put_table(&usd, &table(&[("brl", 5.0)]));
        cache.put_table(&brl, &table(&[("usd", 0.25)]));

        assert_eq!(cache.get(&brl, &usd), Some(0.25));
        assert_eq!(cache.get(&usd, &brl), Some(4.0));
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn test_put_table_skips_invalid_rates() {
        let cache = RateCache::new();
        let usd = CurrencyCode::usd();

        let stored = cache.put_table(
            &usd,
            &table(&[("brl", 5.0), ("xxx", 0.0), ("yyy", -1.0), ("zzz", f64::NAN)]),
        );

        assert_eq!(stored, 1);
        assert!(cache.get(&usd, &CurrencyCode::new("xxx")).is_none());
        assert!(cache.get(&CurrencyCode::new("xxx"), &usd).is_none());
    }

    #[test]
    fn test_historical_cache_is_single_pair() {
        let cache = HistoricalRateCache::new();
        let pair = CurrencyPair::new("usd", "brl");
        let date = NaiveDate::from_ymd_opt(2024, 3, 6).unwrap();

        cache.insert(pair.clone(), date, 4.95);

        assert_eq!(cache.get(&pair, date), Some(4.95));
        assert!(cache.get(&pair.inverse(), date).is_none());
        assert!(cache.get(&pair, date.pred_opt().unwrap()).is_none());
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_concurrent_readers_see_inverse_with_forward() {
        // Consistent cross rates, so overlapping tables write identical values
        let values = [("usd", 1.0), ("eur", 0.8), ("brl", 5.0), ("gbp", 0.5), ("jpy", 150.0)];
        let cache = RateCache::new();

        std::thread::scope(|scope| {
            for (base, base_value) in values {
                let cache = &cache;
                scope.spawn(move || {
                    let from = CurrencyCode::new(base);
                    let rates: Vec<(&str, f64)> = values
                        .iter()
                        .filter(|(code, _)| *code != base)
                        .map(|(code, value)| (*code, value / base_value))
                        .collect();
                    for _ in 0..200 {
                        cache.put_table(&from, &table(&rates));
                    }
                });
            }

            for _ in 0..4 {
                let cache = &cache;
                scope.spawn(move || {
                    for _ in 0..500 {
                        for (a, _) in values {
                            for (b, _) in values {
                                let (from, to) = (CurrencyCode::new(a), CurrencyCode::new(b));
                                if let Some(forward) = cache.get(&from, &to) {
                                    let inverse = cache
                                        .get(&to, &from)
                                        .expect("inverse missing while forward is cached");
                                    assert!((forward * inverse - 1.0).abs() < 1e-9);
                                }
                            }
                        }
                    }
                });
            }
        });

        assert_eq!(cache.len(), values.len() * (values.len() - 1));
    }

    proptest! {
        #[test]
        fn prop_inverse_invariant(rates in proptest::collection::hash_map("[a-z]{3}", 1e-6f64..1e6, 1..40)) {
            let cache = RateCache::new();
            let from = CurrencyCode::new("base");
            let table: RateTable = rates
                .iter()
                .map(|(code, rate)| (CurrencyCode::new(code.as_str()), *rate))
                .collect();

            cache.put_table(&from, &table);

            for (to, rate) in &table {
                let forward = cache.get(&from, to).unwrap();
                let inverse = cache.get(to, &from).unwrap();
                prop_assert_eq!(forward, *rate);
                prop_assert!((inverse * forward - 1.0).abs() < 1e-9);
            }
        }
    }
}
