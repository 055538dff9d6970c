//! Ratio series construction
//!
//! Turns a price history into one [`RatioSeries`] per tracked ratio by asking
//! the data source for the fundamentals applicable on each bar's date.

use futures::stream::{self, StreamExt};
use valuation_core::{MetricValue, PriceBar, RatioName, RatioPoint, RatioSeries, RawFundamentals};

use crate::error::Result;
use crate::source::MarketDataSource;

/// Builds aligned ratio series from per-date fundamentals lookups
#[derive(Debug, Clone, Copy)]
pub struct RatioSeriesBuilder {
    concurrency: usize,
}

impl RatioSeriesBuilder {
    /// `concurrency` bounds the number of lookups in flight; zero is treated as one
    pub fn new(concurrency: usize) -> Self {
        Self {
            concurrency: concurrency.max(1),
        }
    }

    /// One series per ratio in [`RatioName::ALL`] order, each as long as `bars`
    ///
    /// Exactly one lookup is issued per bar. Lookups may complete in any order
    /// but results are reassembled in bar order. A failed or empty lookup marks
    /// that date undefined for every ratio; it never aborts the build.
    pub async fn build(
        &self,
        source: &dyn MarketDataSource,
        symbol: &str,
        bars: &[PriceBar],
    ) -> Vec<RatioSeries> {
        let lookups: Vec<Result<Option<RawFundamentals>>> = stream::iter(bars)
            .map(|bar| source.fetch_fundamentals_at(symbol, bar))
            .buffered(self.concurrency)
            .collect()
            .await;

        let mut failures = 0usize;
        let fundamentals: Vec<Option<RawFundamentals>> = lookups
            .into_iter()
            .zip(bars)
            .map(|(lookup, bar)| {
                lookup.unwrap_or_else(|err| {
                    failures += 1;
                    tracing::debug!(%symbol, date = %bar.date, error = %err, "fundamentals lookup failed");
                    None
                })
            })
            .collect();

        if failures > 0 {
            tracing::warn!(
                %symbol,
                source = source.name(),
                failures,
                total = bars.len(),
                "some fundamentals lookups failed; affected dates are undefined"
            );
        }

        series_from_lookups(bars, &fundamentals)
    }
}

impl Default for RatioSeriesBuilder {
    fn default() -> Self {
        Self::new(8)
    }
}

/// Assemble series from lookups that are already aligned with `bars`
pub fn series_from_lookups(
    bars: &[PriceBar],
    fundamentals: &[Option<RawFundamentals>],
) -> Vec<RatioSeries> {
    debug_assert_eq!(bars.len(), fundamentals.len());

    RatioName::ALL
        .into_iter()
        .map(|ratio| {
            let points = bars
                .iter()
                .zip(fundamentals)
                .map(|(bar, raw)| RatioPoint {
                    date: bar.date,
                    value: ratio_value(raw.as_ref(), ratio),
                })
                .collect();
            RatioSeries::new(ratio, points)
        })
        .collect()
}

/// Read one ratio out of an optional payload
pub fn ratio_value(raw: Option<&RawFundamentals>, ratio: RatioName) -> MetricValue {
    raw.and_then(|r| r.get(ratio.source_field()))
        .map_or(MetricValue::Undefined, MetricValue::from_json)
}
