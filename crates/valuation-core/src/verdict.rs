//! Valuation verdicts

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::metric::RatioName;

/// Where the current ratio sits relative to its history
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Undervalued,
    Overvalued,
}

impl Direction {
    /// `current < average` is undervalued; equality counts as overvalued
    pub fn classify(current: f64, average: f64) -> Self {
        if current < average {
            Self::Undervalued
        } else {
            Self::Overvalued
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Undervalued => "undervalued",
            Self::Overvalued => "overvalued",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classification of one ratio against its historical average
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Verdict {
    pub ratio: RatioName,
    pub direction: Direction,
    pub current: f64,
    pub historical_average: f64,
}

impl Verdict {
    pub fn new(ratio: RatioName, current: f64, historical_average: f64) -> Self {
        Self {
            ratio,
            direction: Direction::classify(current, historical_average),
            current,
            historical_average,
        }
    }

    /// Relative distance from the average, `(current - average) / average`
    ///
    /// `None` when the average is zero.
    pub fn deviation(&self) -> Option<f64> {
        if self.historical_average == 0.0 {
            None
        } else {
            Some((self.current - self.historical_average) / self.historical_average)
        }
    }

    /// One-line explanation naming the security
    pub fn describe(&self, symbol: &str) -> String {
        format!(
            "{symbol} is currently {} compared to its historical average {} ratio ({:.2}).",
            self.direction,
            self.ratio.label(),
            self.historical_average
        )
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {} (current {:.2} vs average {:.2}",
            self.ratio, self.direction, self.current, self.historical_average
        )?;
        if let Some(dev) = self.deviation() {
            write!(f, ", {:+.1}%", dev * 100.0)?;
        }
        f.write_str(")")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_direction_rule() {
        assert_eq!(Direction::classify(12.0, 15.0), Direction::Undervalued);
        assert_eq!(Direction::classify(18.0, 15.0), Direction::Overvalued);
        assert_eq!(Direction::classify(15.0, 15.0), Direction::Overvalued);
        assert_eq!(Direction::classify(14.999_999, 15.0), Direction::Undervalued);
    }

    #[test]
    fn test_deviation() {
        let v = Verdict::new(RatioName::Pe, 12.0, 15.0);
        assert!((v.deviation().unwrap() + 0.2).abs() < 1e-12);

        let zero = Verdict::new(RatioName::Pb, 1.0, 0.0);
        assert_eq!(zero.deviation(), None);

        // Sign follows the average: a negative average flips it
        let negative = Verdict::new(RatioName::EvEbitda, -6.0, -4.0);
        assert!((negative.deviation().unwrap() - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_describe() {
        let v = Verdict::new(RatioName::Pe, 12.0, 15.0);
        assert_eq!(
            v.describe("TCS.NS"),
            "TCS.NS is currently undervalued compared to its historical average P/E ratio (15.00)."
        );
    }

    #[test]
    fn test_display() {
        let v = Verdict::new(RatioName::EvEbitda, 11.0, 10.0);
        assert_eq!(v.to_string(), "EV/EBITDA: overvalued (current 11.00 vs average 10.00, +10.0%)");
    }
}
