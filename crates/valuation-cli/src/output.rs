//! Terminal rendering of valuation reports

use comfy_table::presets::UTF8_FULL;
use comfy_table::{ContentArrangement, Table};
use valuation_core::{FundamentalsSnapshot, MetricName, MetricValue, RatioName};
use valuation_engine::{ValuationAnalysis, ValuationReport};

fn format_value(name: MetricName, value: MetricValue) -> String {
    match name {
        MetricName::MarketCap | MetricName::SharesOutstanding => format!("{value:.0}"),
        _ => format!("{value:.2}"),
    }
}

/// Current fundamentals, one row per metric in schema order
pub fn fundamentals_table(snapshot: &FundamentalsSnapshot) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec!["Metric", "Value"]);

    for (name, value) in snapshot.iter() {
        table.add_row(vec![name.label().to_string(), format_value(name, value)]);
    }

    table
}

/// Current ratio, historical average and verdict per tracked ratio
pub fn averages_table(report: &ValuationReport) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec!["Ratio", "Current", "Historical Avg", "Observations", "Verdict"]);

    for ratio in RatioName::ALL {
        let average = report.averages.get(ratio);
        let verdict = report
            .verdict(ratio)
            .map_or_else(|| "-".to_string(), |v| v.direction.to_string());

        table.add_row(vec![
            ratio.label().to_string(),
            format!("{:.2}", report.snapshot.ratio(ratio)),
            format!("{:.2}", average.value),
            average.observations.to_string(),
            verdict,
        ]);
    }

    table
}

/// Full human-readable rendering of an analysis
pub fn render(analysis: &ValuationAnalysis, period: &str) -> String {
    let report = &analysis.report;
    let mut out = String::new();

    out.push_str(&format!("Fundamentals for {}\n", report.symbol));
    out.push_str(&fundamentals_table(&report.snapshot).to_string());
    out.push('\n');

    out.push_str(&format!(
        "\nHistorical averages over {} trading days ({period})\n",
        report.bar_count()
    ));
    out.push_str(&averages_table(report).to_string());
    out.push('\n');

    if !analysis.dividends.is_empty() {
        out.push_str(&format!(
            "\nDividends in window: {} payments totalling {:.2}\n",
            analysis.dividends.len(),
            analysis.total_dividends()
        ));
    }

    let explanations = report.explanations();
    if !explanations.is_empty() {
        out.push('\n');
        for line in explanations {
            out.push_str(&line);
            out.push('\n');
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use valuation_core::{HistoricalAverage, HistoricalAverages, Symbol, Verdict};

    fn report() -> ValuationReport {
        let snapshot = FundamentalsSnapshot::from_fn(|name| match name {
            MetricName::PriceToEarnings => MetricValue::Defined(12.0),
            MetricName::MarketCap => MetricValue::Defined(2_500_000_000.0),
            _ => MetricValue::Undefined,
        });
        let averages = HistoricalAverages::from_fn(|ratio| match ratio {
            RatioName::Pe => HistoricalAverage {
                value: MetricValue::Defined(15.0),
                observations: 2,
            },
            _ => HistoricalAverage::default(),
        });

        ValuationReport {
            symbol: Symbol::parse("AAPL").unwrap(),
            snapshot,
            series: Vec::new(),
            averages,
            verdicts: vec![Verdict::new(RatioName::Pe, 12.0, 15.0)],
        }
    }

    #[test]
    fn test_fundamentals_table_lists_every_metric() {
        let rendered = fundamentals_table(&report().snapshot).to_string();
        for name in MetricName::ALL {
            assert!(rendered.contains(name.label()), "missing {}", name.label());
        }
        assert!(rendered.contains("2500000000"));
        assert!(rendered.contains("N/A"));
    }

    #[test]
    fn test_averages_table() {
        let rendered = averages_table(&report()).to_string();
        assert!(rendered.contains("15.00"));
        assert!(rendered.contains("undervalued"));
    }

    #[test]
    fn test_render_includes_explanations() {
        let analysis = ValuationAnalysis {
            report: report(),
            price_history: Vec::new(),
            dividends: Vec::new(),
        };
        let rendered = render(&analysis, "1y");
        assert!(rendered.contains(
            "AAPL is currently undervalued compared to its historical average P/E ratio (15.00)."
        ));
        assert!(!rendered.contains("Dividends"));
    }
}
