//! Error types for valuation operations
//!
//! Missing data is not an error here: it travels through the pipeline as
//! [`valuation_core::MetricValue::Undefined`]. These variants cover input that
//! cannot be analysed at all and collaborators that cannot answer.

use thiserror::Error;

/// Valuation engine errors
#[derive(Debug, Error)]
pub enum ValuationError {
    /// Structurally invalid input (malformed symbol, unordered price history)
    #[error("Invalid input: {0}")]
    InvalidInput(#[from] valuation_core::Error),

    /// The data source could not answer at all
    #[error("Data source unavailable for {symbol}: {reason}")]
    SourceUnavailable {
        symbol: String,
        reason: String,
    },

    /// API request failed
    #[error("API error: {0}")]
    ApiError(String),

    /// Rate limit exceeded for API
    #[error("Rate limit exceeded for {provider}")]
    RateLimitExceeded {
        provider: String,
    },

    /// Network or HTTP error
    #[error("Network error: {0}")]
    NetworkError(#[from] reqwest::Error),

    /// JSON parsing error
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// Yahoo Finance API error
    #[error("Yahoo Finance error: {0}")]
    YahooFinanceError(String),

    /// Alpha Vantage API error
    #[error("Alpha Vantage error: {0}")]
    AlphaVantageError(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Cache error
    #[error("Cache error: {0}")]
    CacheError(String),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl ValuationError {
    /// Wrap any collaborator failure as `SourceUnavailable`
    pub fn unavailable(symbol: impl Into<String>, reason: impl ToString) -> Self {
        Self::SourceUnavailable {
            symbol: symbol.into(),
            reason: reason.to_string(),
        }
    }

    /// Whether retrying the same request could succeed
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            Self::NetworkError(_) | Self::RateLimitExceeded { .. } | Self::ApiError(_)
        )
    }
}

/// Result type alias for valuation operations
pub type Result<T> = std::result::Result<T, ValuationError>;

/// Convert anyhow::Error to ValuationError
impl From<anyhow::Error> for ValuationError {
    fn from(err: anyhow::Error) -> Self {
        ValuationError::Other(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ValuationError::from(valuation_core::Error::InvalidSymbol("A B".to_string()));
        assert_eq!(err.to_string(), "Invalid input: Invalid symbol: A B");

        let err = ValuationError::unavailable("AAPL", "connection reset");
        assert_eq!(err.to_string(), "Data source unavailable for AAPL: connection reset");
    }

    #[test]
    fn test_transient_classification() {
        assert!(ValuationError::ApiError("502".to_string()).is_transient());
        assert!(
            ValuationError::RateLimitExceeded {
                provider: "Alpha Vantage".to_string()
            }
            .is_transient()
        );
        assert!(!ValuationError::ConfigError("no key".to_string()).is_transient());
        assert!(!ValuationError::unavailable("AAPL", "gone").is_transient());
    }

    #[test]
    fn test_anyhow_conversion() {
        let err: ValuationError = anyhow::anyhow!("boom").into();
        assert!(matches!(err, ValuationError::Other(msg) if msg == "boom"));
    }
}
