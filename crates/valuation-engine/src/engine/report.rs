//! Analysis result types

use serde::Serialize;
use valuation_core::{
    DividendEvent, FundamentalsSnapshot, HistoricalAverages, PriceBar, RatioName, RatioSeries,
    Symbol, Verdict,
};

/// Output of one valuation run
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValuationReport {
    pub symbol: Symbol,
    /// Current fundamentals in the fixed schema
    pub snapshot: FundamentalsSnapshot,
    /// Per-date ratio values, one series per tracked ratio
    pub series: Vec<RatioSeries>,
    pub averages: HistoricalAverages,
    /// Verdicts for the comparable ratios, in fixed ratio order
    pub verdicts: Vec<Verdict>,
}

impl ValuationReport {
    pub fn verdict(&self, ratio: RatioName) -> Option<&Verdict> {
        self.verdicts.iter().find(|v| v.ratio == ratio)
    }

    /// Ratios without a verdict because current or historical data is missing
    pub fn incomparable(&self) -> Vec<RatioName> {
        RatioName::ALL
            .into_iter()
            .filter(|r| self.verdict(*r).is_none())
            .collect()
    }

    /// One explanation sentence per verdict
    pub fn explanations(&self) -> Vec<String> {
        self.verdicts
            .iter()
            .map(|v| v.describe(self.symbol.as_str()))
            .collect()
    }

    /// Number of price bars the series were built from
    pub fn bar_count(&self) -> usize {
        self.series.first().map_or(0, RatioSeries::len)
    }
}

/// A report together with the market data it was computed from
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValuationAnalysis {
    pub report: ValuationReport,
    pub price_history: Vec<PriceBar>,
    pub dividends: Vec<DividendEvent>,
}

impl ValuationAnalysis {
    /// Latest close in the analysed window
    pub fn last_close(&self) -> Option<f64> {
        self.price_history.last().map(|bar| bar.close)
    }

    /// Sum of dividends paid within the window
    pub fn total_dividends(&self) -> f64 {
        self.dividends.iter().map(|d| d.amount).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use valuation_core::{Direction, HistoricalAverage, MetricValue};

    fn report(verdicts: Vec<Verdict>) -> ValuationReport {
        ValuationReport {
            symbol: Symbol::parse("ITC.NS").unwrap(),
            snapshot: FundamentalsSnapshot::default(),
            series: Vec::new(),
            averages: HistoricalAverages::from_fn(|_| HistoricalAverage {
                value: MetricValue::Defined(10.0),
                observations: 1,
            }),
            verdicts,
        }
    }

    #[test]
    fn test_incomparable_lists_missing_verdicts() {
        let r = report(vec![Verdict::new(RatioName::Pb, 2.0, 3.0)]);
        assert_eq!(r.incomparable(), vec![RatioName::Pe, RatioName::EvEbitda]);
        assert_eq!(r.verdict(RatioName::Pb).unwrap().direction, Direction::Undervalued);
        assert_eq!(r.bar_count(), 0);
    }

    #[test]
    fn test_explanations() {
        let r = report(vec![Verdict::new(RatioName::Pe, 30.0, 25.0)]);
        assert_eq!(r.explanations(), vec![
            "ITC.NS is currently overvalued compared to its historical average P/E ratio (25.00)."
                .to_string()
        ]);
    }

    #[test]
    fn test_analysis_helpers() {
        let day = |d| NaiveDate::from_ymd_opt(2024, 6, d).unwrap();
        let analysis = ValuationAnalysis {
            report: report(Vec::new()),
            price_history: vec![PriceBar::flat(day(3), 410.0, 10), PriceBar::flat(day(4), 415.5, 12)],
            dividends: vec![
                DividendEvent { date: day(1), amount: 6.25 },
                DividendEvent { date: day(2), amount: 7.5 },
            ],
        };
        assert_eq!(analysis.last_close(), Some(415.5));
        assert!((analysis.total_dividends() - 13.75).abs() < 1e-12);
    }
}
