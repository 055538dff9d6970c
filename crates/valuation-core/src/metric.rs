//! Metric and ratio names
//!
//! Both sets are closed. [`MetricName`] enumerates the thirteen metrics of a
//! fundamentals snapshot; [`RatioName`] the three valuation ratios that have a
//! historical comparison.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Metrics carried by a fundamentals snapshot, in display order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetricName {
    PriceToEarnings,
    PriceToBook,
    EvToEbitda,
    ReturnOnEquityPct,
    MarketCap,
    DividendYieldPct,
    SharesOutstanding,
    PriceToSales,
    PriceToCashFlow,
    DebtToEquity,
    Beta,
    EarningsSurprise,
    AnalystRating,
}

impl MetricName {
    pub const COUNT: usize = 13;

    pub const ALL: [Self; Self::COUNT] = [
        Self::PriceToEarnings,
        Self::PriceToBook,
        Self::EvToEbitda,
        Self::ReturnOnEquityPct,
        Self::MarketCap,
        Self::DividendYieldPct,
        Self::SharesOutstanding,
        Self::PriceToSales,
        Self::PriceToCashFlow,
        Self::DebtToEquity,
        Self::Beta,
        Self::EarningsSurprise,
        Self::AnalystRating,
    ];

    /// Human-readable label
    pub const fn label(self) -> &'static str {
        match self {
            Self::PriceToEarnings => "P/E",
            Self::PriceToBook => "P/B",
            Self::EvToEbitda => "EV/EBITDA",
            Self::ReturnOnEquityPct => "ROE (%)",
            Self::MarketCap => "Market Cap",
            Self::DividendYieldPct => "Dividend Yield (%)",
            Self::SharesOutstanding => "Shares Outstanding",
            Self::PriceToSales => "P/S",
            Self::PriceToCashFlow => "P/CF",
            Self::DebtToEquity => "Debt-to-Equity",
            Self::Beta => "Beta",
            Self::EarningsSurprise => "Earnings Surprise",
            Self::AnalystRating => "Analyst Rating",
        }
    }

    /// Field name in a raw fundamentals payload
    pub const fn source_field(self) -> &'static str {
        match self {
            Self::PriceToEarnings => "trailingPE",
            Self::PriceToBook => "priceToBook",
            Self::EvToEbitda => "enterpriseToEbitda",
            Self::ReturnOnEquityPct => "returnOnEquity",
            Self::MarketCap => "marketCap",
            Self::DividendYieldPct => "dividendYield",
            Self::SharesOutstanding => "sharesOutstanding",
            Self::PriceToSales => "priceToSalesTrailing12Months",
            Self::PriceToCashFlow => "priceToCashflow",
            Self::DebtToEquity => "debtToEquity",
            Self::Beta => "beta",
            Self::EarningsSurprise => "earningsQuarterlyGrowth",
            Self::AnalystRating => "recommendationMean",
        }
    }

    /// Whether the raw field is a fraction reported as a percentage
    pub const fn is_percentage(self) -> bool {
        matches!(self, Self::ReturnOnEquityPct | Self::DividendYieldPct)
    }

    /// Position in [`MetricName::ALL`]
    pub const fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for MetricName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Valuation ratios tracked over history
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RatioName {
    Pe,
    Pb,
    EvEbitda,
}

impl RatioName {
    /// Fixed comparison order
    pub const ALL: [Self; 3] = [Self::Pe, Self::Pb, Self::EvEbitda];

    /// The snapshot metric holding the current value of this ratio
    pub const fn metric(self) -> MetricName {
        match self {
            Self::Pe => MetricName::PriceToEarnings,
            Self::Pb => MetricName::PriceToBook,
            Self::EvEbitda => MetricName::EvToEbitda,
        }
    }

    pub const fn label(self) -> &'static str {
        self.metric().label()
    }

    pub const fn source_field(self) -> &'static str {
        self.metric().source_field()
    }
}

impl fmt::Display for RatioName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_matches_index() {
        for (i, name) in MetricName::ALL.iter().enumerate() {
            assert_eq!(name.index(), i);
        }
    }

    #[test]
    fn test_source_fields_are_unique() {
        let mut fields: Vec<_> = MetricName::ALL.iter().map(|m| m.source_field()).collect();
        fields.sort_unstable();
        fields.dedup();
        assert_eq!(fields.len(), MetricName::COUNT);
    }

    #[test]
    fn test_ratio_metrics() {
        assert_eq!(RatioName::Pe.metric(), MetricName::PriceToEarnings);
        assert_eq!(RatioName::Pb.source_field(), "priceToBook");
        assert_eq!(RatioName::EvEbitda.to_string(), "EV/EBITDA");
    }

    #[test]
    fn test_percentages() {
        let pct: Vec<_> = MetricName::ALL.into_iter().filter(|m| m.is_percentage()).collect();
        assert_eq!(pct, vec![MetricName::ReturnOnEquityPct, MetricName::DividendYieldPct]);
    }
}
