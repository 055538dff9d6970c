//! Metrics snapshot assembly
//!
//! Normalises an arbitrary fundamentals payload into the fixed
//! [`FundamentalsSnapshot`] schema. Absent keys, `null` and non-numeric values
//! all become [`MetricValue::Undefined`]; nothing defaults to zero.

use serde_json::Value;
use valuation_core::{FundamentalsSnapshot, MetricName, MetricValue, RawFundamentals};

/// Textual analyst consensus, used when no numeric mean is present
pub const RECOMMENDATION_KEY_FIELD: &str = "recommendationKey";

/// Build the fixed-schema snapshot from a raw payload
///
/// Extra fields in `raw` are ignored.
pub fn assemble_snapshot(raw: &RawFundamentals) -> FundamentalsSnapshot {
    FundamentalsSnapshot::from_fn(|name| metric_value(raw, name))
}

fn metric_value(raw: &RawFundamentals, name: MetricName) -> MetricValue {
    let value = raw
        .get(name.source_field())
        .map_or(MetricValue::Undefined, MetricValue::from_json);

    if name.is_percentage() {
        return value.map(|fraction| fraction * 100.0).round_dp(2);
    }

    if name == MetricName::AnalystRating && value.is_undefined() {
        return raw
            .get(RECOMMENDATION_KEY_FIELD)
            .and_then(Value::as_str)
            .map_or(MetricValue::Undefined, recommendation_score);
    }

    value
}

/// Map a consensus key onto the 1 (strong buy) to 5 (sell) scale
fn recommendation_score(key: &str) -> MetricValue {
    let normalized: String = key
        .trim()
        .to_ascii_lowercase()
        .chars()
        .filter(char::is_ascii_alphabetic)
        .collect();

    match normalized.as_str() {
        "strongbuy" => MetricValue::Defined(1.0),
        "buy" | "outperform" => MetricValue::Defined(2.0),
        "hold" | "neutral" => MetricValue::Defined(3.0),
        "underperform" => MetricValue::Defined(4.0),
        "sell" | "strongsell" => MetricValue::Defined(5.0),
        _ => MetricValue::Undefined,
    }
}
