//! Valuation classification against history

use valuation_core::{FundamentalsSnapshot, HistoricalAverages, RatioName, Verdict};

/// One verdict per comparable ratio, in P/E, P/B, EV/EBITDA order
///
/// A ratio is skipped when either its current value or its historical average
/// is undefined. Otherwise `current < average` is undervalued and anything
/// else, equality included, is overvalued. No magnitude threshold applies.
pub fn classify(snapshot: &FundamentalsSnapshot, averages: &HistoricalAverages) -> Vec<Verdict> {
    RatioName::ALL
        .into_iter()
        .filter_map(|ratio| {
            let current = snapshot.ratio(ratio).as_f64()?;
            let average = averages.value(ratio).as_f64()?;
            Some(Verdict::new(ratio, current, average))
        })
        .collect()
}
