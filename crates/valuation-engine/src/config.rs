//! Configuration for valuation analysis runs

use crate::error::{Result, ValuationError};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use valuation_core::HistoryPeriod;

/// Provider for daily price history
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum DataProvider {
    /// Yahoo Finance (default, no API key required)
    #[default]
    Yahoo,
    /// Alpha Vantage (requires API key)
    AlphaVantage,
}

/// Configuration for valuation analysis
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValuationConfig {
    /// Where price bars come from
    pub price_provider: DataProvider,

    /// Window of price history to analyse
    pub history_period: HistoryPeriod,

    /// Maximum number of per-date fundamentals lookups in flight
    pub lookup_concurrency: usize,

    /// Cache TTL for fundamental data
    pub cache_ttl_fundamental: Duration,

    /// Maximum number of retries for API calls
    pub max_retries: u32,

    /// Initial backoff duration for retries
    pub retry_backoff_base: Duration,

    /// Request timeout duration
    pub request_timeout: Duration,

    /// Alpha Vantage API key (optional)
    pub alpha_vantage_api_key: Option<String>,

    /// Alpha Vantage requests per minute
    pub alpha_vantage_rate_limit: u32,

    /// Reject symbols without an exchange suffix such as `.NS`
    pub require_exchange_suffix: bool,
}

impl Default for ValuationConfig {
    fn default() -> Self {
        Self {
            price_provider: DataProvider::Yahoo,
            history_period: HistoryPeriod::OneYear,
            lookup_concurrency: 8,
            cache_ttl_fundamental: Duration::from_secs(3600), // 1 hour
            max_retries: 3,
            retry_backoff_base: Duration::from_secs(1),
            request_timeout: Duration::from_secs(30),
            alpha_vantage_api_key: None,
            alpha_vantage_rate_limit: 5, // free tier
            require_exchange_suffix: false,
        }
    }
}

impl ValuationConfig {
    /// Create a new configuration builder
    pub fn builder() -> ValuationConfigBuilder {
        ValuationConfigBuilder::default()
    }

    /// Load Alpha Vantage API key from environment
    pub fn with_env_api_key(mut self) -> Self {
        if let Ok(key) = std::env::var("ALPHA_VANTAGE_API_KEY") {
            self.alpha_vantage_api_key = Some(key);
        }
        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.price_provider == DataProvider::AlphaVantage && self.alpha_vantage_api_key.is_none()
        {
            return Err(ValuationError::ConfigError(
                "Alpha Vantage API key required when using AlphaVantage provider".to_string(),
            ));
        }

        if self.max_retries == 0 {
            return Err(ValuationError::ConfigError(
                "max_retries must be greater than 0".to_string(),
            ));
        }

        if self.lookup_concurrency == 0 {
            return Err(ValuationError::ConfigError(
                "lookup_concurrency must be greater than 0".to_string(),
            ));
        }

        if self.alpha_vantage_rate_limit == 0 {
            return Err(ValuationError::ConfigError(
                "alpha_vantage_rate_limit must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }
}

/// Builder for ValuationConfig
#[derive(Debug, Default)]
pub struct ValuationConfigBuilder {
    price_provider: Option<DataProvider>,
    history_period: Option<HistoryPeriod>,
    lookup_concurrency: Option<usize>,
    cache_ttl_fundamental: Option<Duration>,
    max_retries: Option<u32>,
    retry_backoff_base: Option<Duration>,
    request_timeout: Option<Duration>,
    alpha_vantage_api_key: Option<String>,
    alpha_vantage_rate_limit: Option<u32>,
    require_exchange_suffix: Option<bool>,
}

impl ValuationConfigBuilder {
    /// Set the price history provider
    pub fn price_provider(mut self, provider: DataProvider) -> Self {
        self.price_provider = Some(provider);
        self
    }

    /// Set the analysed history window
    pub fn history_period(mut self, period: HistoryPeriod) -> Self {
        self.history_period = Some(period);
        self
    }

    /// Set the per-date lookup fan-out
    pub fn lookup_concurrency(mut self, concurrency: usize) -> Self {
        self.lookup_concurrency = Some(concurrency);
        self
    }

    /// Set cache TTL for fundamental data
    pub fn cache_ttl_fundamental(mut self, duration: Duration) -> Self {
        self.cache_ttl_fundamental = Some(duration);
        self
    }

    /// Set maximum retries
    pub fn max_retries(mut self, retries: u32) -> Self {
        self.max_retries = Some(retries);
        self
    }

    /// Set retry backoff base duration
    pub fn retry_backoff_base(mut self, duration: Duration) -> Self {
        self.retry_backoff_base = Some(duration);
        self
    }

    /// Set request timeout
    pub fn request_timeout(mut self, duration: Duration) -> Self {
        self.request_timeout = Some(duration);
        self
    }

    /// Set Alpha Vantage API key
    pub fn alpha_vantage_api_key(mut self, key: impl Into<String>) -> Self {
        self.alpha_vantage_api_key = Some(key.into());
        self
    }

    /// Set Alpha Vantage requests per minute
    pub fn alpha_vantage_rate_limit(mut self, per_minute: u32) -> Self {
        self.alpha_vantage_rate_limit = Some(per_minute);
        self
    }

    /// Require an exchange suffix on symbols
    pub fn require_exchange_suffix(mut self, required: bool) -> Self {
        self.require_exchange_suffix = Some(required);
        self
    }

    /// Load Alpha Vantage API key from environment
    pub fn with_env_api_key(mut self) -> Self {
        if let Ok(key) = std::env::var("ALPHA_VANTAGE_API_KEY") {
            self.alpha_vantage_api_key = Some(key);
        }
        self
    }

    /// Build the configuration
    pub fn build(self) -> Result<ValuationConfig> {
        let defaults = ValuationConfig::default();

        let config = ValuationConfig {
            price_provider: self.price_provider.unwrap_or(defaults.price_provider),
            history_period: self.history_period.unwrap_or(defaults.history_period),
            lookup_concurrency: self.lookup_concurrency.unwrap_or(defaults.lookup_concurrency),
            cache_ttl_fundamental: self
                .cache_ttl_fundamental
                .unwrap_or(defaults.cache_ttl_fundamental),
            max_retries: self.max_retries.unwrap_or(defaults.max_retries),
            retry_backoff_base: self.retry_backoff_base.unwrap_or(defaults.retry_backoff_base),
            request_timeout: self.request_timeout.unwrap_or(defaults.request_timeout),
            alpha_vantage_api_key: self.alpha_vantage_api_key,
            alpha_vantage_rate_limit: self
                .alpha_vantage_rate_limit
                .unwrap_or(defaults.alpha_vantage_rate_limit),
            require_exchange_suffix: self
                .require_exchange_suffix
                .unwrap_or(defaults.require_exchange_suffix),
        };

        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ValuationConfig::default();
        assert_eq!(config.price_provider, DataProvider::Yahoo);
        assert_eq!(config.history_period, HistoryPeriod::OneYear);
        assert_eq!(config.lookup_concurrency, 8);
        assert_eq!(config.max_retries, 3);
        assert!(!config.require_exchange_suffix);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_builder() {
        let config = ValuationConfig::builder()
            .history_period(HistoryPeriod::TwoYears)
            .lookup_concurrency(2)
            .max_retries(5)
            .request_timeout(Duration::from_secs(60))
            .require_exchange_suffix(true)
            .build()
            .unwrap();

        assert_eq!(config.history_period, HistoryPeriod::TwoYears);
        assert_eq!(config.lookup_concurrency, 2);
        assert_eq!(config.max_retries, 5);
        assert_eq!(config.request_timeout, Duration::from_secs(60));
        assert!(config.require_exchange_suffix);
    }

    #[test]
    fn test_validation_alpha_vantage_no_key() {
        let config = ValuationConfig {
            price_provider: DataProvider::AlphaVantage,
            alpha_vantage_api_key: None,
            ..Default::default()
        };

        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_alpha_vantage_with_key() {
        let config = ValuationConfig {
            price_provider: DataProvider::AlphaVantage,
            alpha_vantage_api_key: Some("test_key".to_string()),
            ..Default::default()
        };

        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validation_zero_concurrency() {
        let result = ValuationConfig::builder().lookup_concurrency(0).build();
        assert!(matches!(result, Err(ValuationError::ConfigError(_))));
    }
}
