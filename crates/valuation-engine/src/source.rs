//! Market data collaborator contract
//!
//! The engine never reaches for a global client. Callers hand a
//! [`MarketDataSource`] to [`crate::ValuationEngine::new`] and every lookup in a
//! run goes through it.

use async_trait::async_trait;
use valuation_core::{DividendEvent, HistoryPeriod, PriceBar, RawFundamentals};

use crate::error::Result;

/// Supplier of price history and fundamentals for one security at a time
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MarketDataSource: Send + Sync {
    /// Daily bars for the window, ascending by date
    async fn fetch_price_history(&self, symbol: &str, period: HistoryPeriod)
    -> Result<Vec<PriceBar>>;

    /// Latest fundamentals payload
    async fn fetch_fundamentals_snapshot(&self, symbol: &str) -> Result<RawFundamentals>;

    /// Fundamentals applicable on the bar's date
    ///
    /// The bar is passed whole so providers can combine the close of that day
    /// with statements known at the time. `Ok(None)` means the source has
    /// nothing for this date.
    async fn fetch_fundamentals_at(
        &self,
        symbol: &str,
        bar: &PriceBar,
    ) -> Result<Option<RawFundamentals>>;

    /// Dividends paid within the window
    async fn fetch_dividend_history(
        &self,
        _symbol: &str,
        _period: HistoryPeriod,
    ) -> Result<Vec<DividendEvent>> {
        Ok(Vec::new())
    }

    /// Source name for logs
    fn name(&self) -> &'static str;
}
