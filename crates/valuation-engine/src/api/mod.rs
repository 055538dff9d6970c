//! API clients for market data providers

pub mod alpha_vantage;
pub mod market_data;
pub mod statements;
pub mod yahoo;

pub use alpha_vantage::AlphaVantageClient;
pub use market_data::MarketDataClient;
pub use statements::QuarterlyStatements;
pub use yahoo::YahooFinanceClient;
