//! Tagged metric value
//!
//! Every number the engine handles is either a defined finite number or the
//! explicit undefined marker. There is no implicit zero.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// A metric value that is either a finite number or undefined
///
/// # Example
///
/// ```
/// use valuation_core::MetricValue;
///
/// let pe = MetricValue::new(12.5);
/// assert_eq!(pe.as_f64(), Some(12.5));
///
/// assert!(MetricValue::new(f64::NAN).is_undefined());
/// assert_eq!(MetricValue::Undefined.to_string(), "N/A");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(from = "Option<f64>", into = "Option<f64>")]
pub enum MetricValue {
    /// A finite number
    Defined(f64),
    /// The value could not be determined
    #[default]
    Undefined,
}

impl MetricValue {
    /// Wrap a number; NaN and infinities become `Undefined`
    pub fn new(value: f64) -> Self {
        if value.is_finite() {
            Self::Defined(value)
        } else {
            Self::Undefined
        }
    }

    /// Read a value out of a loosely typed JSON payload
    ///
    /// Numbers and numeric strings are defined. `null`, booleans, objects and
    /// strings that do not parse (such as `"None"` or `"-"`) are undefined.
    pub fn from_json(value: &Value) -> Self {
        match value {
            Value::Number(n) => n.as_f64().map_or(Self::Undefined, Self::new),
            Value::String(s) => s.trim().parse::<f64>().map_or(Self::Undefined, Self::new),
            _ => Self::Undefined,
        }
    }

    pub fn is_defined(&self) -> bool {
        matches!(self, Self::Defined(_))
    }

    pub fn is_undefined(&self) -> bool {
        !self.is_defined()
    }

    /// The number, if defined
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Defined(v) => Some(*v),
            Self::Undefined => None,
        }
    }

    /// Apply `f` to a defined value; undefined stays undefined
    pub fn map(self, f: impl FnOnce(f64) -> f64) -> Self {
        match self {
            Self::Defined(v) => Self::new(f(v)),
            Self::Undefined => Self::Undefined,
        }
    }

    /// Round a defined value to `places` decimal places
    pub fn round_dp(self, places: i32) -> Self {
        let factor = 10f64.powi(places);
        self.map(|v| (v * factor).round() / factor)
    }
}

impl From<f64> for MetricValue {
    fn from(value: f64) -> Self {
        Self::new(value)
    }
}

impl From<Option<f64>> for MetricValue {
    fn from(value: Option<f64>) -> Self {
        value.map_or(Self::Undefined, Self::new)
    }
}

impl From<MetricValue> for Option<f64> {
    fn from(value: MetricValue) -> Self {
        value.as_f64()
    }
}

impl fmt::Display for MetricValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Defined(v) => match f.precision() {
                Some(p) => write!(f, "{v:.p$}"),
                None => write!(f, "{v}"),
            },
            Self::Undefined => f.write_str("N/A"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_non_finite_is_undefined() {
        assert_eq!(MetricValue::new(f64::INFINITY), MetricValue::Undefined);
        assert_eq!(MetricValue::new(f64::NEG_INFINITY), MetricValue::Undefined);
        assert_eq!(MetricValue::new(-3.0), MetricValue::Defined(-3.0));
    }

    #[test]
    fn test_zero_is_defined() {
        let zero = MetricValue::new(0.0);
        assert!(zero.is_defined());
        assert_eq!(zero.as_f64(), Some(0.0));
    }

    #[test]
    fn test_from_json() {
        assert_eq!(MetricValue::from_json(&json!(21.4)), MetricValue::Defined(21.4));
        assert_eq!(MetricValue::from_json(&json!(7)), MetricValue::Defined(7.0));
        assert_eq!(MetricValue::from_json(&json!(" 1.25 ")), MetricValue::Defined(1.25));
        assert!(MetricValue::from_json(&json!(null)).is_undefined());
        assert!(MetricValue::from_json(&json!("None")).is_undefined());
        assert!(MetricValue::from_json(&json!("-")).is_undefined());
        assert!(MetricValue::from_json(&json!("NaN")).is_undefined());
        assert!(MetricValue::from_json(&json!(true)).is_undefined());
        assert!(MetricValue::from_json(&json!({"raw": 1.0})).is_undefined());
    }

    #[test]
    fn test_round_dp() {
        assert_eq!(MetricValue::new(15.678).round_dp(2), MetricValue::Defined(15.68));
        assert_eq!(MetricValue::Undefined.round_dp(2), MetricValue::Undefined);
    }

    #[test]
    fn test_serde_as_nullable_number() {
        let values = vec![MetricValue::Defined(1.5), MetricValue::Undefined];
        let json = serde_json::to_value(&values).unwrap();
        assert_eq!(json, json!([1.5, null]));

        let back: Vec<MetricValue> = serde_json::from_value(json).unwrap();
        assert_eq!(back, values);
    }

    #[test]
    fn test_display() {
        assert_eq!(MetricValue::Defined(2.5).to_string(), "2.5");
        assert_eq!(format!("{:.2}", MetricValue::Defined(2.5)), "2.50");
        assert_eq!(format!("{:.2}", MetricValue::Undefined), "N/A");
    }
}
