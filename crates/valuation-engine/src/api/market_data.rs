//! Market data source backed by Yahoo Finance and Alpha Vantage
//!
//! Prices and dividends come from the configured price provider. Current
//! fundamentals come from the Alpha Vantage overview, completed with the
//! figures derived from its quarterly statements. Per-date ratios are rebuilt
//! from the same statements.

use std::sync::Arc;

use async_trait::async_trait;
use cached::{Cached, TimedCache};
use chrono::Utc;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};
use valuation_core::{DividendEvent, HistoryPeriod, MetricName, PriceBar, RawFundamentals};

use crate::cache::{CacheKey, ResponseCache};
use crate::config::{DataProvider, ValuationConfig};
use crate::error::{Result, ValuationError};
use crate::retry::RetryPolicy;
use crate::source::MarketDataSource;

use super::alpha_vantage::{AlphaVantageClient, overview_fundamentals};
use super::statements::{QuarterlyStatements, StatementPayloads};
use super::yahoo::{YahooFinanceClient, normalize_bars};

/// Production [`MarketDataSource`]
pub struct MarketDataClient {
    config: Arc<ValuationConfig>,
    yahoo: YahooFinanceClient,
    alpha_vantage: Option<AlphaVantageClient>,
    overview_cache: ResponseCache,
    // Held across the statement fetch so concurrent per-date lookups load once
    statements: Mutex<TimedCache<String, Arc<QuarterlyStatements>>>,
    retry: RetryPolicy,
}

impl MarketDataClient {
    pub fn new(config: Arc<ValuationConfig>) -> Result<Self> {
        config.validate()?;

        let alpha_vantage = config
            .alpha_vantage_api_key
            .as_deref()
            .map(|key| {
                AlphaVantageClient::new(
                    key,
                    config.alpha_vantage_rate_limit,
                    config.request_timeout,
                )
            })
            .transpose()?;

        if alpha_vantage.is_none() {
            info!("no Alpha Vantage API key configured; fundamentals will be undefined");
        }

        Ok(Self {
            yahoo: YahooFinanceClient::new(),
            alpha_vantage,
            overview_cache: ResponseCache::new(config.cache_ttl_fundamental),
            statements: Mutex::new(TimedCache::with_lifespan(config.cache_ttl_fundamental)),
            retry: RetryPolicy::from_config(&config),
            config,
        })
    }

    fn alpha_vantage(&self, symbol: &str) -> Result<&AlphaVantageClient> {
        self.alpha_vantage
            .as_ref()
            .ok_or_else(|| ValuationError::unavailable(symbol, "Alpha Vantage API key not configured"))
    }

    /// Quarterly statements for `symbol`, loaded once per cache lifetime
    ///
    /// A failed load is remembered as an empty set so the remaining per-date
    /// lookups of the run do not repeat it.
    async fn statements(&self, symbol: &str) -> Result<Arc<QuarterlyStatements>> {
        let av = self.alpha_vantage(symbol)?;

        let mut cache = self.statements.lock().await;
        if let Some(statements) = cache.cache_get(symbol) {
            return Ok(Arc::clone(statements));
        }

        let loaded = async {
            let earnings = self.retry.execute("EARNINGS", || av.get_earnings(symbol)).await?;
            let balance = self
                .retry
                .execute("BALANCE_SHEET", || av.get_balance_sheet(symbol))
                .await?;
            let income = self
                .retry
                .execute("INCOME_STATEMENT", || av.get_income_statement(symbol))
                .await?;
            let cash_flow = self
                .retry
                .execute("CASH_FLOW", || av.get_cash_flow(symbol))
                .await?;
            Ok::<_, ValuationError>(QuarterlyStatements::from_payloads(StatementPayloads {
                earnings: &earnings,
                balance_sheet: &balance,
                income_statement: &income,
                cash_flow: &cash_flow,
            }))
        }
        .await;

        match loaded {
            Ok(statements) => {
                debug!(%symbol, empty = statements.is_empty(), "loaded quarterly statements");
                let statements = Arc::new(statements);
                cache.cache_set(symbol.to_string(), Arc::clone(&statements));
                Ok(statements)
            }
            Err(err) => {
                warn!(%symbol, error = %err, "quarterly statements unavailable");
                cache.cache_set(symbol.to_string(), Arc::new(QuarterlyStatements::default()));
                Err(err)
            }
        }
    }

    /// Drop cached responses for `symbol`
    pub async fn invalidate(&self, symbol: &str) {
        self.overview_cache
            .invalidate(&CacheKey::new(symbol, "overview"))
            .await;
        self.statements.lock().await.cache_remove(symbol);
    }
}

#[async_trait]
impl MarketDataSource for MarketDataClient {
    async fn fetch_price_history(
        &self,
        symbol: &str,
        period: HistoryPeriod,
    ) -> Result<Vec<PriceBar>> {
        match self.config.price_provider {
            DataProvider::Yahoo => {
                self.retry
                    .execute("price history", || self.yahoo.get_price_history(symbol, period))
                    .await
            }
            DataProvider::AlphaVantage => {
                let av = self.alpha_vantage(symbol)?;
                let full = !matches!(
                    period,
                    HistoryPeriod::OneMonth | HistoryPeriod::ThreeMonths
                );
                let bars = self
                    .retry
                    .execute("TIME_SERIES_DAILY", || av.get_daily(symbol, full))
                    .await?;

                let start = period.start_from(Utc::now()).date_naive();
                Ok(normalize_bars(
                    bars.into_iter().filter(|b| b.date >= start).collect(),
                ))
            }
        }
    }

    async fn fetch_fundamentals_snapshot(&self, symbol: &str) -> Result<RawFundamentals> {
        let av = self.alpha_vantage(symbol)?;

        let overview = self
            .overview_cache
            .get_or_fetch(CacheKey::new(symbol, "overview"), || async move {
                let overview = self
                    .retry
                    .execute("OVERVIEW", || av.get_company_overview(symbol))
                    .await?;
                Ok::<_, ValuationError>(serde_json::Value::Object(overview))
            })
            .await?;

        let mut raw = match overview {
            serde_json::Value::Object(map) => overview_fundamentals(&map),
            _ => RawFundamentals::new(),
        };

        match self.statements(symbol).await {
            Ok(statements) => {
                let market_cap = raw
                    .get(MetricName::MarketCap.source_field())
                    .and_then(serde_json::Value::as_f64);
                raw.extend(statements.current_fundamentals(market_cap, Utc::now().date_naive()));
            }
            Err(err) => debug!(%symbol, error = %err, "snapshot without statement-derived metrics"),
        }

        Ok(raw)
    }

    async fn fetch_fundamentals_at(
        &self,
        symbol: &str,
        bar: &PriceBar,
    ) -> Result<Option<RawFundamentals>> {
        let statements = self.statements(symbol).await?;
        Ok(statements.ratios_at(bar))
    }

    async fn fetch_dividend_history(
        &self,
        symbol: &str,
        period: HistoryPeriod,
    ) -> Result<Vec<DividendEvent>> {
        self.retry
            .execute("dividends", || self.yahoo.get_dividends(symbol, period))
            .await
    }

    fn name(&self) -> &'static str {
        match self.config.price_provider {
            DataProvider::Yahoo => "yahoo+alpha-vantage",
            DataProvider::AlphaVantage => "alpha-vantage",
        }
    }
}
