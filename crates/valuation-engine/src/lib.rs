//! Historical valuation analysis
//!
//! This crate decides whether a stock looks cheap or expensive relative to its
//! own history. It:
//!
//! - Normalises a fundamentals payload into a fixed 13-metric snapshot
//! - Builds P/E, P/B and EV/EBITDA series over a daily price history
//! - Averages each series, skipping dates with no data
//! - Compares current ratios with those averages
//!
//! Missing data never becomes zero. It is carried as
//! [`valuation_core::MetricValue::Undefined`] and a ratio without both a
//! current value and a historical average gets no verdict.
//!
//! # Architecture
//!
//! [`ValuationEngine`] drives the pipeline against a [`MarketDataSource`]:
//! - [`snapshot::assemble_snapshot`]: current metrics snapshot
//! - [`ratio_series::RatioSeriesBuilder`]: per-date ratio lookups
//! - [`aggregator::aggregate`]: historical averages
//! - [`classifier::classify`]: verdicts
//!
//! [`api::MarketDataClient`] is the production source, backed by Yahoo Finance
//! and Alpha Vantage.
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use valuation_engine::{MarketDataClient, ValuationConfig, ValuationEngine};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Arc::new(ValuationConfig::default().with_env_api_key());
//!     let source = Arc::new(MarketDataClient::new(Arc::clone(&config))?);
//!     let engine = ValuationEngine::new(source, config);
//!
//!     let analysis = engine.analyze("ITC.NS").await?;
//!     for line in analysis.report.explanations() {
//!         println!("{line}");
//!     }
//!     Ok(())
//! }
//! ```

pub mod aggregator;
pub mod api;
pub mod cache;
pub mod classifier;
pub mod config;
pub mod engine;
pub mod error;
pub mod ratio_series;
pub mod retry;
pub mod snapshot;
pub mod source;

// Re-export main types for convenience
pub use api::MarketDataClient;
pub use config::{DataProvider, ValuationConfig};
pub use engine::{ValuationAnalysis, ValuationEngine, ValuationReport};
pub use error::{Result, ValuationError};
pub use source::MarketDataSource;
