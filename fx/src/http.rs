//! HTTP rate provider for the `currency-api` JSON endpoints.
//!
//! Endpoints, relative to the configured base URL:
//!
//! - `@{version}/v1/currencies.json` - catalog, `{ code: name }`
//! - `@{version}/v1/currencies/{base}.json` - current table
//! - `@{YYYY-MM-DD}/v1/currencies/{base}.json` - table published on a date
//!
//! Rate tables have the shape `{ "date": "...", "{base}": { code: rate } }`.

use async_trait::async_trait;
use chrono::NaiveDate;
use fxrates_common::{iso_date, parse_iso_date, CurrencyCode};
use reqwest::{Client, StatusCode};
use serde_json::Value;
use std::collections::HashMap;
use tracing::{debug, instrument, warn};

use crate::config::ProviderConfig;
use crate::error::{FxError, FxResult};
use crate::provider::{CurrencyNames, RateProvider, RateSnapshot, RateTable};

const PROVIDER_NAME: &str = "CURRENCY_API";

/// Rate provider backed by the `currency-api` CDN.
pub struct HttpRateProvider {
    client: Client,
    config: ProviderConfig,
}

impl HttpRateProvider {
    /// Create a provider with its own HTTP client.
    pub fn new(config: ProviderConfig) -> FxResult<Self> {
        let client = Client::builder()
            .timeout(config.request_timeout)
            .user_agent(config.user_agent.clone())
            .build()?;

        Ok(Self { client, config })
    }

    /// Create a provider that shares an existing HTTP client.
    pub fn with_client(client: Client, config: ProviderConfig) -> Self {
        Self { client, config }
    }

    pub fn currencies_url(&self) -> String {
        self.url(&self.config.version, "currencies.json")
    }

    pub fn latest_url(&self, base: &CurrencyCode) -> String {
        self.url(&self.config.version, &format!("currencies/{}.json", base.as_str()))
    }

    pub fn snapshot_url(&self, base: &CurrencyCode, date: NaiveDate) -> String {
        self.url(&iso_date(date), &format!("currencies/{}.json", base.as_str()))
    }

    fn url(&self, version: &str, path: &str) -> String {
        format!(
            "{}@{}/v1/{}",
            self.config.base_url.trim_end_matches('/'),
            version,
            path
        )
    }

    async fn get(&self, url: &str) -> FxResult<reqwest::Response> {
        debug!(url = %url, "Fetching");
        Ok(self.client.get(url).send().await?)
    }

    async fn read_body(response: reqwest::Response) -> FxResult<String> {
        let response = response.error_for_status()?;
        Ok(response.text().await?)
    }
}

#[async_trait]
impl RateProvider for HttpRateProvider {
    fn name(&self) -> &str {
        PROVIDER_NAME
    }

    #[instrument(skip(self))]
    async fn fetch_currencies(&self) -> FxResult<CurrencyNames> {
        let response = self.get(&self.currencies_url()).await?;
        let body = Self::read_body(response).await?;
        parse_currencies(&body)
    }

    #[instrument(skip(self))]
    async fn fetch_latest(&self, base: &CurrencyCode) -> FxResult<RateSnapshot> {
        let response = self.get(&self.latest_url(base)).await?;
        let body = Self::read_body(response).await?;
        parse_snapshot(base, &body)
    }

    #[instrument(skip(self))]
    async fn fetch_snapshot(
        &self,
        base: &CurrencyCode,
        date: NaiveDate,
    ) -> FxResult<RateSnapshot> {
        let response = self.get(&self.snapshot_url(base, date)).await?;

        if response.status() == StatusCode::NOT_FOUND {
            return Err(FxError::SnapshotUnavailable {
                base: base.as_str().to_string(),
                date,
            });
        }

        let body = Self::read_body(response).await?;
        parse_snapshot(base, &body)
    }
}

/// Parse a catalog body: `{ code: displayName }`.
pub fn parse_currencies(body: &str) -> FxResult<CurrencyNames> {
    let names: HashMap<String, String> = serde_json::from_str(body)?;
    Ok(names
        .into_iter()
        .map(|(code, name)| (CurrencyCode::new(code), name))
        .collect())
}

/// Parse a rate table body for `base`.
pub fn parse_snapshot(base: &CurrencyCode, body: &str) -> FxResult<RateSnapshot> {
    let mut payload: HashMap<String, Value> = serde_json::from_str(body)?;

    let table = payload.remove(base.as_str()).ok_or_else(|| {
        FxError::ParseError(format!("missing \"{}\" table in response", base.as_str()))
    })?;
    let entries: HashMap<String, Value> = serde_json::from_value(table)?;
    let mut rates = RateTable::with_capacity(entries.len());
    for (code, value) in entries {
        match value.as_f64() {
            Some(rate) => {
                rates.insert(CurrencyCode::new(code), rate);
            }
            None => warn!(base = %base, to = %code, value = %value, "Skipping non-numeric rate"),
        }
    }

    let date = payload
        .get("date")
        .and_then(Value::as_str)
        .and_then(|d| parse_iso_date(d).ok());

    Ok(RateSnapshot {
        base: base.clone(),
        date,
        rates,
    })
}
