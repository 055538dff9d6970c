//! Core domain types for historical valuation analysis
//!
//! This crate defines the data model shared by the valuation engine and its
//! collaborators: the tagged [`MetricValue`], the closed sets of metric and
//! ratio names, price bars, fundamentals snapshots, ratio series, historical
//! averages and verdicts.

pub mod error;
pub mod metric;
pub mod models;
pub mod period;
pub mod series;
pub mod snapshot;
pub mod symbol;
pub mod value;
pub mod verdict;

pub use error::{Error, Result};
pub use metric::{MetricName, RatioName};
pub use models::{DividendEvent, PriceBar, RawFundamentals, validate_price_history};
pub use period::HistoryPeriod;
pub use series::{HistoricalAverage, HistoricalAverages, RatioPoint, RatioSeries};
pub use snapshot::FundamentalsSnapshot;
pub use symbol::Symbol;
pub use value::MetricValue;
pub use verdict::{Direction, Verdict};
