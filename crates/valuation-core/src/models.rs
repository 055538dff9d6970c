//! Market data received from a data source

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Loosely typed fundamentals payload as returned by a data source
pub type RawFundamentals = serde_json::Map<String, serde_json::Value>;

/// One trading day of price data
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceBar {
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: u64,
}

impl PriceBar {
    /// Bar with the same price for open, high, low and close
    pub fn flat(date: NaiveDate, price: f64, volume: u64) -> Self {
        Self {
            date,
            open: price,
            high: price,
            low: price,
            close: price,
            volume,
        }
    }
}

/// A single dividend payment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DividendEvent {
    pub date: NaiveDate,
    pub amount: f64,
}

/// Check that bars are ordered by strictly ascending date
///
/// An empty sequence is valid.
pub fn validate_price_history(bars: &[PriceBar]) -> Result<()> {
    if let Some(pair) = bars.windows(2).find(|w| w[0].date >= w[1].date) {
        return Err(Error::InvalidPriceHistory(format!(
            "bars must be strictly ascending by date, found {} followed by {}",
            pair[0].date, pair[1].date
        )));
    }
    Ok(())
}
