//! Per-date ratio series and their historical averages

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::metric::RatioName;
use crate::value::MetricValue;

/// Ratio value observed on one price-bar date
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RatioPoint {
    pub date: NaiveDate,
    pub value: MetricValue,
}

/// Ratio values aligned 1:1 with a price history
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RatioSeries {
    pub ratio: RatioName,
    pub points: Vec<RatioPoint>,
}

impl RatioSeries {
    pub fn new(ratio: RatioName, points: Vec<RatioPoint>) -> Self {
        Self { ratio, points }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Defined observations, in date order
    pub fn defined_values(&self) -> impl Iterator<Item = f64> + '_ {
        self.points.iter().filter_map(|p| p.value.as_f64())
    }

    pub fn defined_count(&self) -> usize {
        self.defined_values().count()
    }
}

/// Average of one ratio over the observed window
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct HistoricalAverage {
    /// Mean of the defined observations, undefined when there were none
    pub value: MetricValue,
    /// Number of defined observations that went into the mean
    pub observations: usize,
}

/// One historical average per tracked ratio
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct HistoricalAverages {
    pub pe: HistoricalAverage,
    pub pb: HistoricalAverage,
    pub ev_ebitda: HistoricalAverage,
}

impl HistoricalAverages {
    /// Build by evaluating `f` for each ratio
    pub fn from_fn(mut f: impl FnMut(RatioName) -> HistoricalAverage) -> Self {
        Self {
            pe: f(RatioName::Pe),
            pb: f(RatioName::Pb),
            ev_ebitda: f(RatioName::EvEbitda),
        }
    }

    pub fn get(&self, ratio: RatioName) -> &HistoricalAverage {
        match ratio {
            RatioName::Pe => &self.pe,
            RatioName::Pb => &self.pb,
            RatioName::EvEbitda => &self.ev_ebitda,
        }
    }

    /// The average value for `ratio`
    pub fn value(&self, ratio: RatioName) -> MetricValue {
        self.get(ratio).value
    }

    /// Entries in fixed ratio order
    pub fn iter(&self) -> impl Iterator<Item = (RatioName, &HistoricalAverage)> {
        RatioName::ALL.into_iter().map(move |r| (r, self.get(r)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn point(d: u32, value: MetricValue) -> RatioPoint {
        RatioPoint {
            date: NaiveDate::from_ymd_opt(2024, 1, d).unwrap(),
            value,
        }
    }

    #[test]
    fn test_defined_values_skip_undefined() {
        let series = RatioSeries::new(
            RatioName::Pe,
            vec![
                point(2, MetricValue::Defined(10.0)),
                point(3, MetricValue::Undefined),
                point(4, MetricValue::Defined(20.0)),
            ],
        );
        assert_eq!(series.len(), 3);
        assert_eq!(series.defined_values().collect::<Vec<_>>(), vec![10.0, 20.0]);
        assert_eq!(series.defined_count(), 2);
    }

    #[test]
    fn test_averages_lookup_and_order() {
        let averages = HistoricalAverages::from_fn(|ratio| HistoricalAverage {
            value: match ratio {
                RatioName::Pe => MetricValue::Defined(15.0),
                RatioName::Pb => MetricValue::Defined(2.0),
                RatioName::EvEbitda => MetricValue::Undefined,
            },
            observations: usize::from(ratio != RatioName::EvEbitda),
        });

        assert_eq!(averages.value(RatioName::Pe), MetricValue::Defined(15.0));
        assert_eq!(averages.get(RatioName::EvEbitda).observations, 0);

        let order: Vec<_> = averages.iter().map(|(r, _)| r).collect();
        assert_eq!(order, RatioName::ALL.to_vec());
    }

    #[test]
    fn test_default_averages_are_undefined() {
        let averages = HistoricalAverages::default();
        assert!(averages.iter().all(|(_, a)| a.value.is_undefined()));
    }
}
