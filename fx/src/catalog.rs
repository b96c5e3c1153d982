//! Currency catalog.

use std::sync::Arc;

use fxrates_common::CurrencyCode;
use serde::Serialize;
use tracing::{info, instrument};

use crate::error::FxResult;
use crate::provider::{CurrencyNames, RateProvider};

/// Currency codes with their display names, ordered by code.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Currencies(CurrencyNames);

impl Currencies {
    pub fn new(names: CurrencyNames) -> Self {
        Self(names)
    }

    /// Get the display name for `code`.
    pub fn name(&self, code: &CurrencyCode) -> Option<&str> {
        self.0.get(code).map(String::as_str)
    }

    /// Get the picker label for `code`, e.g. `USD - US Dollar`.
    pub fn label(&self, code: &CurrencyCode) -> Option<String> {
        self.name(code).map(|name| format!("{} - {}", code, name))
    }

    pub fn iter(&self) -> impl Iterator<Item = (&CurrencyCode, &str)> {
        self.0.iter().map(|(code, name)| (code, name.as_str()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Fetches the currency catalog. Not cached: every call hits the provider.
#[derive(Clone)]
pub struct CurrencyCatalog {
    provider: Arc<dyn RateProvider>,
}

impl CurrencyCatalog {
    pub fn new(provider: Arc<dyn RateProvider>) -> Self {
        Self { provider }
    }

    #[instrument(skip(self), fields(provider = self.provider.name()))]
    pub async fn fetch_currencies(&self) -> FxResult<Currencies> {
        let names = self.provider.fetch_currencies().await?;
        info!(count = names.len(), "Fetched currency catalog");
        Ok(Currencies::new(names))
    }
}
