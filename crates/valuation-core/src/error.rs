//! Error types for valuation-core

use thiserror::Error;

/// Result type alias for valuation-core
pub type Result<T> = std::result::Result<T, Error>;

/// Structurally invalid input, rejected before any analysis starts
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// Symbol is empty or contains characters a ticker cannot hold
    #[error("Invalid symbol: {0}")]
    InvalidSymbol(String),

    /// Price bars are not strictly ascending by date
    #[error("Invalid price history: {0}")]
    InvalidPriceHistory(String),

    /// Unknown history period identifier
    #[error("Invalid period: {0}")]
    InvalidPeriod(String),
}
