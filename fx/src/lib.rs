//! fxrates FX Engine
//!
//! Retrieves foreign-exchange rates from a remote currency-rate service and
//! caches them in memory.
//!
//! # Features
//!
//! - Current-rate lookups; one fetch caches the whole table for a base
//!   currency in both directions
//! - Dated rate lookups with a per-pair historical cache
//! - Multi-day series fetched concurrently, with per-date failures reported
//!   as data
//! - Amount conversion on top of current rates
//!
//! # Example
//!
//! ```rust,ignore
//! use fxrates_fx::{FxEngine, ProviderConfig};
//! use fxrates_common::CurrencyCode;
//!
//! let engine = FxEngine::from_config(ProviderConfig::default())?;
//!
//! let rate = engine.get_rate(&CurrencyCode::usd(), &CurrencyCode::brl()).await?;
//! let period = engine.get_period(&CurrencyCode::usd(), &CurrencyCode::brl(), 7).await;
//! ```

pub mod cache;
pub mod catalog;
pub mod config;
pub mod conversion;
pub mod current;
pub mod engine;
pub mod error;
pub mod historical;
pub mod http;
pub mod period;
pub mod provider;

pub use cache::{
    CacheStats, HistoricalRateCache, RateCache, SharedHistoricalRateCache, SharedRateCache,
};
pub use catalog::{Currencies, CurrencyCatalog};
pub use config::{FxConfig, ProviderConfig};
pub use conversion::{Conversion, Converter};
pub use current::CurrentRateService;
pub use engine::FxEngine;
pub use error::{FxError, FxResult};
pub use historical::HistoricalRateService;
pub use http::HttpRateProvider;
pub use period::{DateRecord, PeriodAggregator, RatePeriod};
pub use provider::{RateProvider, RateSnapshot, RateTable};

#[cfg(any(test, feature = "test-utils"))]
pub use provider::MockRateProvider;
