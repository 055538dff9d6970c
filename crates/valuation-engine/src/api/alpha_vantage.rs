//! Alpha Vantage API client

use crate::error::{Result, ValuationError};
use chrono::NaiveDate;
use governor::clock::DefaultClock;
use governor::state::{InMemoryState, NotKeyed};
use governor::{Quota, RateLimiter};
use reqwest::Client;
use serde_json::{Value, json};
use std::num::NonZeroU32;
use std::sync::Arc;
use std::time::Duration;
use valuation_core::{MetricName, MetricValue, PriceBar, RawFundamentals};

use super::statements::number_field;

const BASE_URL: &str = "https://www.alphavantage.co/query";
const PROVIDER: &str = "Alpha Vantage";

type SharedRateLimiter = Arc<RateLimiter<NotKeyed, InMemoryState, DefaultClock>>;

/// Overview fields and the fundamentals keys they feed
const OVERVIEW_FIELDS: [(&str, MetricName); 10] = [
    ("PERatio", MetricName::PriceToEarnings),
    ("PriceToBookRatio", MetricName::PriceToBook),
    ("EVToEBITDA", MetricName::EvToEbitda),
    ("ReturnOnEquityTTM", MetricName::ReturnOnEquityPct),
    ("MarketCapitalization", MetricName::MarketCap),
    ("DividendYield", MetricName::DividendYieldPct),
    ("SharesOutstanding", MetricName::SharesOutstanding),
    ("PriceToSalesRatioTTM", MetricName::PriceToSales),
    ("Beta", MetricName::Beta),
    ("QuarterlyEarningsGrowthYOY", MetricName::EarningsSurprise),
];

/// Analyst rating counts, weighted on the 1 (strong buy) to 5 (strong sell) scale
const ANALYST_RATINGS: [(&str, f64); 5] = [
    ("AnalystRatingStrongBuy", 1.0),
    ("AnalystRatingBuy", 2.0),
    ("AnalystRatingHold", 3.0),
    ("AnalystRatingSell", 4.0),
    ("AnalystRatingStrongSell", 5.0),
];

/// Alpha Vantage API client
#[derive(Debug, Clone)]
pub struct AlphaVantageClient {
    client: Client,
    api_key: String,
    rate_limiter: SharedRateLimiter,
}

impl AlphaVantageClient {
    /// Create a new Alpha Vantage client
    ///
    /// # Arguments
    /// * `api_key` - Alpha Vantage API key
    /// * `rate_limit` - Maximum requests per minute (5 on the free tier)
    /// * `timeout` - Per-request timeout
    pub fn new(api_key: impl Into<String>, rate_limit: u32, timeout: Duration) -> Result<Self> {
        let quota = Quota::per_minute(NonZeroU32::new(rate_limit).unwrap_or(NonZeroU32::MIN));
        let rate_limiter = Arc::new(RateLimiter::direct(quota));

        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            api_key: api_key.into(),
            rate_limiter,
        })
    }

    /// Issue one rate-limited query and screen the payload for API errors
    async fn query(&self, function: &str, symbol: &str, extra: &[(&str, &str)]) -> Result<Value> {
        self.rate_limiter.until_ready().await;

        let mut params = vec![
            ("function", function),
            ("symbol", symbol),
            ("apikey", self.api_key.as_str()),
        ];
        params.extend_from_slice(extra);

        tracing::debug!(function, symbol, "alpha vantage request");
        let response = self.client.get(BASE_URL).query(&params).send().await?;

        if !response.status().is_success() {
            return Err(ValuationError::ApiError(format!(
                "{PROVIDER} HTTP error: {}",
                response.status()
            )));
        }

        let data: Value = response.json().await?;
        check_payload(function, symbol, data)
    }

    /// Company overview as returned by the `OVERVIEW` endpoint
    pub async fn get_company_overview(&self, symbol: &str) -> Result<RawFundamentals> {
        match self.query("OVERVIEW", symbol, &[]).await? {
            Value::Object(map) => Ok(map),
            other => Err(ValuationError::AlphaVantageError(format!(
                "unexpected overview payload: {other}"
            ))),
        }
    }

    /// Reported quarterly and annual EPS
    pub async fn get_earnings(&self, symbol: &str) -> Result<Value> {
        self.query("EARNINGS", symbol, &[]).await
    }

    pub async fn get_balance_sheet(&self, symbol: &str) -> Result<Value> {
        self.query("BALANCE_SHEET", symbol, &[]).await
    }

    pub async fn get_income_statement(&self, symbol: &str) -> Result<Value> {
        self.query("INCOME_STATEMENT", symbol, &[]).await
    }

    pub async fn get_cash_flow(&self, symbol: &str) -> Result<Value> {
        self.query("CASH_FLOW", symbol, &[]).await
    }

    /// Daily bars, oldest first
    ///
    /// The compact response holds the latest 100 trading days; `full` asks for
    /// the whole history.
    pub async fn get_daily(&self, symbol: &str, full: bool) -> Result<Vec<PriceBar>> {
        let outputsize = if full { "full" } else { "compact" };
        let data = self
            .query("TIME_SERIES_DAILY", symbol, &[("outputsize", outputsize)])
            .await?;
        parse_daily(&data)
    }
}

/// Reject error, throttling and empty payloads
fn check_payload(function: &str, symbol: &str, data: Value) -> Result<Value> {
    if let Some(error) = data.get("Error Message") {
        return Err(ValuationError::AlphaVantageError(format!("{function}: {error}")));
    }

    // Throttled responses come back as HTTP 200 with a note
    if data.get("Note").is_some() || data.get("Information").is_some() {
        return Err(ValuationError::RateLimitExceeded {
            provider: PROVIDER.to_string(),
        });
    }

    // Unknown symbols yield an empty object
    if data.as_object().is_none_or(serde_json::Map::is_empty) {
        return Err(ValuationError::AlphaVantageError(format!(
            "{function}: no data for {symbol}"
        )));
    }

    Ok(data)
}

/// Parse a `TIME_SERIES_DAILY` payload into bars sorted by date
pub fn parse_daily(data: &Value) -> Result<Vec<PriceBar>> {
    let series = data
        .get("Time Series (Daily)")
        .and_then(Value::as_object)
        .ok_or_else(|| ValuationError::AlphaVantageError("No daily data found".to_string()))?;

    let mut bars = Vec::with_capacity(series.len());
    for (day, values) in series {
        let date = NaiveDate::parse_from_str(day, "%Y-%m-%d").map_err(|e| {
            ValuationError::AlphaVantageError(format!("invalid date {day}: {e}"))
        })?;

        let Some(close) = number_field(values, "4. close") else {
            continue;
        };

        bars.push(PriceBar {
            date,
            open: number_field(values, "1. open").unwrap_or(close),
            high: number_field(values, "2. high").unwrap_or(close),
            low: number_field(values, "3. low").unwrap_or(close),
            close,
            volume: number_field(values, "5. volume").map_or(0, |v| v as u64),
        });
    }

    bars.sort_by_key(|b| b.date);
    Ok(bars)
}

/// Translate an `OVERVIEW` payload into the fundamentals keys the snapshot reads
///
/// The overview carries no price-to-cash-flow or debt-to-equity figure; those
/// come from the quarterly statements.
pub fn overview_fundamentals(overview: &RawFundamentals) -> RawFundamentals {
    let mut raw = RawFundamentals::new();

    for (field, metric) in OVERVIEW_FIELDS {
        let value = map_number(overview, field);
        raw.insert(metric.source_field().to_string(), json!(value));
    }

    if let Some(mean) = recommendation_mean(overview) {
        raw.insert(MetricName::AnalystRating.source_field().to_string(), json!(mean));
    }

    raw
}

fn map_number(map: &RawFundamentals, field: &str) -> Option<f64> {
    map.get(field).and_then(|v| MetricValue::from_json(v).as_f64())
}

/// Count-weighted mean analyst rating, if any analyst covers the stock
fn recommendation_mean(overview: &RawFundamentals) -> Option<f64> {
    let (weighted, count) = ANALYST_RATINGS
        .iter()
        .filter_map(|(field, score)| {
            let n = map_number(overview, field)?;
            Some((n * score, n))
        })
        .fold((0.0, 0.0), |(w, c), (nw, n)| (w + nw, c + n));

    (count > 0.0).then(|| weighted / count)
}
