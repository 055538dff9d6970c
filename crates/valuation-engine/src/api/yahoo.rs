//! Yahoo Finance API client

use crate::error::{Result, ValuationError};
use chrono::{DateTime, NaiveDate, Utc};
use time::OffsetDateTime;
use valuation_core::{DividendEvent, HistoryPeriod, PriceBar};
use yahoo_finance_api as yahoo;

/// Yahoo Finance API client
#[derive(Debug, Clone, Default)]
pub struct YahooFinanceClient {}

impl YahooFinanceClient {
    /// Create a new Yahoo Finance client
    pub fn new() -> Self {
        Self {}
    }

    fn connector() -> Result<yahoo::YahooConnector> {
        yahoo::YahooConnector::new().map_err(|e| ValuationError::YahooFinanceError(e.to_string()))
    }

    async fn history(&self, symbol: &str, period: HistoryPeriod) -> Result<yahoo::YResponse> {
        let end = Utc::now();
        let start = period.start_from(end);

        // Convert chrono DateTime to time OffsetDateTime
        let start_odt = OffsetDateTime::from_unix_timestamp(start.timestamp()).map_err(|e| {
            ValuationError::YahooFinanceError(format!("Invalid start timestamp: {e}"))
        })?;
        let end_odt = OffsetDateTime::from_unix_timestamp(end.timestamp()).map_err(|e| {
            ValuationError::YahooFinanceError(format!("Invalid end timestamp: {e}"))
        })?;

        Self::connector()?
            .get_quote_history(symbol, start_odt, end_odt)
            .await
            .map_err(|e| ValuationError::YahooFinanceError(e.to_string()))
    }

    /// Daily bars for `symbol` over `period`, oldest first
    pub async fn get_price_history(
        &self,
        symbol: &str,
        period: HistoryPeriod,
    ) -> Result<Vec<PriceBar>> {
        let response = self.history(symbol, period).await?;
        let quotes = response
            .quotes()
            .map_err(|e| ValuationError::YahooFinanceError(e.to_string()))?;

        let bars = quotes
            .iter()
            .filter_map(|q| {
                Some(PriceBar {
                    date: date_from_timestamp(q.timestamp as i64)?,
                    open: q.open,
                    high: q.high,
                    low: q.low,
                    close: q.close,
                    volume: q.volume,
                })
            })
            .collect();

        Ok(normalize_bars(bars))
    }

    /// Cash dividends paid within `period`, oldest first
    pub async fn get_dividends(
        &self,
        symbol: &str,
        period: HistoryPeriod,
    ) -> Result<Vec<DividendEvent>> {
        let response = self.history(symbol, period).await?;
        let dividends = response
            .dividends()
            .map_err(|e| ValuationError::YahooFinanceError(e.to_string()))?;

        let mut events: Vec<DividendEvent> = dividends
            .iter()
            .filter_map(|d| {
                Some(DividendEvent {
                    date: date_from_timestamp(d.date as i64)?,
                    amount: d.amount,
                })
            })
            .collect();
        events.sort_by_key(|e| e.date);

        Ok(events)
    }
}

fn date_from_timestamp(timestamp: i64) -> Option<NaiveDate> {
    DateTime::from_timestamp(timestamp, 0).map(|dt| dt.date_naive())
}

/// Sort by date and keep one bar per trading day
///
/// Yahoo repeats the live bar at the end of a range during market hours;
/// the later copy wins.
pub(crate) fn normalize_bars(mut bars: Vec<PriceBar>) -> Vec<PriceBar> {
    bars.sort_by_key(|b| b.date);
    bars.reverse();
    bars.dedup_by_key(|b| b.date);
    bars.reverse();
    bars.retain(|b| b.close.is_finite());
    bars
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 5, d).unwrap()
    }

    #[test]
    fn test_normalize_bars_sorts_and_dedups() {
        let bars = vec![
            PriceBar::flat(day(3), 12.0, 1),
            PriceBar::flat(day(1), 10.0, 1),
            PriceBar::flat(day(2), 11.0, 1),
            PriceBar::flat(day(3), 12.5, 2),
        ];

        let normalized = normalize_bars(bars);
        let closes: Vec<_> = normalized.iter().map(|b| (b.date, b.close)).collect();
        assert_eq!(closes, vec![(day(1), 10.0), (day(2), 11.0), (day(3), 12.5)]);
        assert!(valuation_core::validate_price_history(&normalized).is_ok());
    }

    #[test]
    fn test_normalize_drops_non_finite_closes() {
        let bars = vec![PriceBar::flat(day(1), f64::NAN, 0), PriceBar::flat(day(2), 9.0, 0)];
        assert_eq!(normalize_bars(bars).len(), 1);
    }

    #[test]
    fn test_date_from_timestamp() {
        // 2024-05-01T13:30:00Z
        assert_eq!(date_from_timestamp(1_714_570_200), Some(day(1)));
    }

    #[tokio::test]
    #[ignore] // Requires network access
    async fn test_get_price_history() {
        let client = YahooFinanceClient::new();
        let bars = client
            .get_price_history("AAPL", HistoryPeriod::OneMonth)
            .await
            .unwrap();
        assert!(!bars.is_empty());
        assert!(valuation_core::validate_price_history(&bars).is_ok());
    }

    #[tokio::test]
    #[ignore] // Requires network access
    async fn test_get_dividends() {
        let client = YahooFinanceClient::new();
        let dividends = client.get_dividends("ITC.NS", HistoryPeriod::TwoYears).await;
        assert!(dividends.is_ok());
    }
}
