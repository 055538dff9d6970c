//! Fixed-schema fundamentals snapshot

use serde::ser::{Serialize, SerializeMap, Serializer};

use crate::metric::{MetricName, RatioName};
use crate::value::MetricValue;

/// Point-in-time fundamentals with exactly one value per [`MetricName`]
///
/// The key set is closed: there is no way to add or remove metrics after
/// construction, and every metric is present even when undefined.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct FundamentalsSnapshot {
    values: [MetricValue; MetricName::COUNT],
}

impl FundamentalsSnapshot {
    /// Build a snapshot by evaluating `f` for every metric
    pub fn from_fn(f: impl FnMut(MetricName) -> MetricValue) -> Self {
        Self {
            values: MetricName::ALL.map(f),
        }
    }

    pub fn get(&self, name: MetricName) -> MetricValue {
        self.values[name.index()]
    }

    /// Current value of a tracked ratio
    pub fn ratio(&self, ratio: RatioName) -> MetricValue {
        self.get(ratio.metric())
    }

    /// All metrics in display order
    pub fn iter(&self) -> impl Iterator<Item = (MetricName, MetricValue)> + '_ {
        MetricName::ALL.into_iter().zip(self.values.iter().copied())
    }

    pub fn defined_count(&self) -> usize {
        self.values.iter().filter(|v| v.is_defined()).count()
    }
}

impl Serialize for FundamentalsSnapshot {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(MetricName::COUNT))?;
        for (name, value) in self.iter() {
            map.serialize_entry(name.label(), &value)?;
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_all_undefined() {
        let snapshot = FundamentalsSnapshot::default();
        assert_eq!(snapshot.iter().count(), MetricName::COUNT);
        assert_eq!(snapshot.defined_count(), 0);
    }

    #[test]
    fn test_from_fn_and_lookup() {
        let snapshot = FundamentalsSnapshot::from_fn(|name| match name {
            MetricName::PriceToEarnings => MetricValue::Defined(12.0),
            MetricName::Beta => MetricValue::Defined(0.9),
            _ => MetricValue::Undefined,
        });

        assert_eq!(snapshot.ratio(RatioName::Pe), MetricValue::Defined(12.0));
        assert_eq!(snapshot.get(MetricName::Beta), MetricValue::Defined(0.9));
        assert!(snapshot.ratio(RatioName::EvEbitda).is_undefined());
        assert_eq!(snapshot.defined_count(), 2);
    }

    #[test]
    fn test_serializes_every_label_in_order() {
        let snapshot = FundamentalsSnapshot::from_fn(|name| {
            if name == MetricName::MarketCap {
                MetricValue::Defined(1.0e9)
            } else {
                MetricValue::Undefined
            }
        });

        let json = serde_json::to_string(&snapshot).unwrap();
        assert!(json.starts_with("{\"P/E\":null,\"P/B\":null"));
        assert!(json.contains("\"Market Cap\":1000000000.0"));
        assert!(json.ends_with("\"Analyst Rating\":null}"));
    }
}
