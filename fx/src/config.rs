//! Provider and engine configuration.

use std::time::Duration;

/// Default provider endpoint (version selector is appended after `@`).
pub const DEFAULT_BASE_URL: &str = "https://cdn.jsdelivr.net/npm/@fawazahmed0/currency-api";

/// Configuration for the HTTP rate provider.
#[derive(Debug, Clone)]
pub struct ProviderConfig {
    /// Endpoint prefix, without the `@version` selector.
    pub base_url: String,
    /// Version selector used for the catalog and current rates.
    pub version: String,
    /// Request timeout applied by the HTTP client.
    pub request_timeout: Duration,
    /// User agent sent with every request.
    pub user_agent: String,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            version: "latest".to_string(),
            request_timeout: Duration::from_secs(30),
            user_agent: concat!("fxrates/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

/// Top-level configuration.
#[derive(Debug, Clone)]
pub struct FxConfig {
    /// Provider configuration.
    pub provider: ProviderConfig,
    /// Log level used when `RUST_LOG` is unset.
    pub log_level: String,
}

impl Default for FxConfig {
    fn default() -> Self {
        Self {
            provider: ProviderConfig::default(),
            log_level: "info".to_string(),
        }
    }
}

impl FxConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(url) = std::env::var("FXRATES_BASE_URL") {
            config.provider.base_url = url;
        }

        if let Ok(version) = std::env::var("FXRATES_VERSION") {
            config.provider.version = version;
        }

        if let Ok(secs) = std::env::var("FXRATES_TIMEOUT_SECS") {
            if let Ok(secs) = secs.parse() {
                config.provider.request_timeout = Duration::from_secs(secs);
            }
        }

        if let Ok(level) = std::env::var("LOG_LEVEL") {
            config.log_level = level;
        }

        config
    }

    /// Validate configuration.
    pub fn validate(&self) -> Result<(), String> {
        if self.provider.base_url.is_empty() {
            return Err("Provider base URL cannot be empty".to_string());
        }

        if !self.provider.base_url.starts_with("http://")
            && !self.provider.base_url.starts_with("https://")
        {
            return Err(format!(
                "Provider base URL must be http(s): {}",
                self.provider.base_url
            ));
        }

        if self.provider.version.is_empty() {
            return Err("Provider version cannot be empty".to_string());
        }

        if self.provider.request_timeout.is_zero() {
            return Err("Request timeout cannot be zero".to_string());
        }

        Ok(())
    }
}
