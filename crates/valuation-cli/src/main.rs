//! Command-line interface for valuation-rs

mod output;

use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, ValueEnum};
use tracing::info;
use valuation_core::HistoryPeriod;
use valuation_engine::{DataProvider, MarketDataClient, ValuationConfig, ValuationEngine};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Provider {
    Yahoo,
    AlphaVantage,
}

impl From<Provider> for DataProvider {
    fn from(provider: Provider) -> Self {
        match provider {
            Provider::Yahoo => DataProvider::Yahoo,
            Provider::AlphaVantage => DataProvider::AlphaVantage,
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "valuation")]
#[command(about = "Compare a stock's valuation ratios with their own history", long_about = None)]
struct Args {
    /// Ticker symbol, e.g. AAPL or ITC.NS
    symbol: String,

    /// History window: 1mo, 3mo, 6mo, 1y, 2y, 5y, 10y, ytd or max
    #[arg(short, long, default_value = "1y")]
    period: HistoryPeriod,

    /// Price history provider
    #[arg(long, value_enum, default_value_t = Provider::Yahoo)]
    provider: Provider,

    /// Maximum per-date fundamentals lookups in flight
    #[arg(short, long)]
    concurrency: Option<usize>,

    /// Reject symbols without an exchange suffix such as .NS
    #[arg(long)]
    require_suffix: bool,

    /// Print the report as JSON
    #[arg(long)]
    json: bool,

    /// Emit logs as JSON
    #[arg(long)]
    log_json: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // Initialize tracing
    if args.log_json {
        valuation_utils::init_tracing_json();
    } else {
        valuation_utils::init_tracing();
    }

    let mut builder = ValuationConfig::builder()
        .price_provider(args.provider.into())
        .history_period(args.period)
        .require_exchange_suffix(args.require_suffix)
        .with_env_api_key();
    if let Some(concurrency) = args.concurrency {
        builder = builder.lookup_concurrency(concurrency);
    }
    let config = Arc::new(builder.build()?);

    let source = Arc::new(MarketDataClient::new(Arc::clone(&config))?);
    let engine = ValuationEngine::new(source, config);

    info!(symbol = %args.symbol, period = %args.period, "Starting valuation");

    let analysis = engine
        .analyze(&args.symbol)
        .await
        .with_context(|| format!("valuation of {} failed", args.symbol))?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&analysis.report)?);
    } else {
        print!("{}", output::render(&analysis, args.period.as_str()));
    }

    Ok(())
}
