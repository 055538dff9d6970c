//! Valuation Engine - runs the full pipeline for one security

use std::sync::Arc;

use tracing::{info, warn};
use valuation_core::{PriceBar, RawFundamentals, Symbol, validate_price_history};

use crate::aggregator::aggregate;
use crate::classifier::classify;
use crate::config::ValuationConfig;
use crate::error::{Result, ValuationError};
use crate::ratio_series::RatioSeriesBuilder;
use crate::snapshot::assemble_snapshot;
use crate::source::MarketDataSource;

use super::report::{ValuationAnalysis, ValuationReport};

/// Valuation Engine
pub struct ValuationEngine {
    source: Arc<dyn MarketDataSource>,
    config: Arc<ValuationConfig>,
    builder: RatioSeriesBuilder,
}

impl ValuationEngine {
    pub fn new(source: Arc<dyn MarketDataSource>, config: Arc<ValuationConfig>) -> Self {
        let builder = RatioSeriesBuilder::new(config.lookup_concurrency);
        Self {
            source,
            config,
            builder,
        }
    }

    pub fn config(&self) -> &ValuationConfig {
        &self.config
    }

    pub fn source_name(&self) -> &'static str {
        self.source.name()
    }

    /// Validate a user supplied ticker under the configured symbol rules
    pub fn parse_symbol(&self, input: &str) -> Result<Symbol> {
        let symbol = if self.config.require_exchange_suffix {
            Symbol::parse_with_exchange(input)?
        } else {
            Symbol::parse(input)?
        };
        Ok(symbol)
    }

    /// Run the valuation over data the caller already holds
    ///
    /// Only the per-date fundamentals lookups touch the data source. An empty
    /// price history is valid and yields empty series with no verdicts.
    pub async fn run_analysis(
        &self,
        symbol: &Symbol,
        price_history: &[PriceBar],
        current: &RawFundamentals,
    ) -> Result<ValuationReport> {
        validate_price_history(price_history)?;

        info!(
            %symbol,
            bars = price_history.len(),
            source = self.source.name(),
            "running valuation analysis"
        );

        let snapshot = assemble_snapshot(current);
        let series = self
            .builder
            .build(self.source.as_ref(), symbol.as_str(), price_history)
            .await;
        let averages = aggregate(&series);
        let verdicts = classify(&snapshot, &averages);

        info!(
            %symbol,
            defined_metrics = snapshot.defined_count(),
            verdicts = verdicts.len(),
            "valuation analysis complete"
        );

        Ok(ValuationReport {
            symbol: symbol.clone(),
            snapshot,
            series,
            averages,
            verdicts,
        })
    }

    /// Fetch market data for `symbol` and run the valuation over it
    ///
    /// A price history failure is fatal. Missing current fundamentals or
    /// dividends only degrade the report.
    pub async fn analyze(&self, symbol: &str) -> Result<ValuationAnalysis> {
        let symbol = self.parse_symbol(symbol)?;
        let period = self.config.history_period;

        let (history, current, dividends) = tokio::join!(
            self.source.fetch_price_history(symbol.as_str(), period),
            self.source.fetch_fundamentals_snapshot(symbol.as_str()),
            self.source.fetch_dividend_history(symbol.as_str(), period),
        );

        let price_history = history.map_err(|err| match err {
            err @ ValuationError::SourceUnavailable { .. } => err,
            other => ValuationError::unavailable(symbol.as_str(), other),
        })?;

        let current = current.unwrap_or_else(|err| {
            warn!(%symbol, error = %err, "current fundamentals unavailable");
            RawFundamentals::new()
        });

        let dividends = dividends.unwrap_or_else(|err| {
            warn!(%symbol, error = %err, "dividend history unavailable");
            Vec::new()
        });

        let report = self.run_analysis(&symbol, &price_history, &current).await?;

        Ok(ValuationAnalysis {
            report,
            price_history,
            dividends,
        })
    }
}
