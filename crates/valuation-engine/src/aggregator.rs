//! Historical aggregation of ratio series

use valuation_core::{HistoricalAverage, HistoricalAverages, MetricValue, RatioName, RatioSeries};

/// Plain unweighted mean of the defined entries of `series`
///
/// Undefined entries are ignored. With no defined entries the result is
/// undefined, which callers must read as "cannot compare".
pub fn historical_average(series: &RatioSeries) -> HistoricalAverage {
    let (sum, observations) = series
        .defined_values()
        .fold((0.0, 0usize), |(sum, n), v| (sum + v, n + 1));

    let value = if observations == 0 {
        MetricValue::Undefined
    } else {
        MetricValue::new(sum / observations as f64)
    };

    HistoricalAverage {
        value,
        observations,
    }
}

/// Averages for every tracked ratio
///
/// A ratio with no series in `series` gets an undefined average.
pub fn aggregate(series: &[RatioSeries]) -> HistoricalAverages {
    HistoricalAverages::from_fn(|ratio: RatioName| {
        series
            .iter()
            .find(|s| s.ratio == ratio)
            .map(historical_average)
            .unwrap_or_default()
    })
}
