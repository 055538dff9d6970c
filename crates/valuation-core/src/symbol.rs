//! Ticker symbol validation

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::LazyLock;

use crate::error::{Error, Result};

static TICKER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\^?[A-Z0-9][A-Z0-9.\-=]{0,19}$").expect("ticker pattern is valid")
});

static EXCHANGE_SUFFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^.]\.[A-Z]{1,4}$").expect("suffix pattern is valid"));

/// Upper-cased, validated ticker symbol
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Symbol(String);

impl Symbol {
    /// Normalise and validate a user-supplied ticker
    pub fn parse(input: &str) -> Result<Self> {
        let normalized = input.trim().to_uppercase();
        if !TICKER.is_match(&normalized) {
            return Err(Error::InvalidSymbol(input.trim().to_string()));
        }
        Ok(Self(normalized))
    }

    /// Like [`Symbol::parse`], additionally requiring an exchange suffix such as `.NS`
    pub fn parse_with_exchange(input: &str) -> Result<Self> {
        let symbol = Self::parse(input)?;
        if !symbol.has_exchange_suffix() {
            return Err(Error::InvalidSymbol(format!(
                "{} (expected an exchange suffix, e.g. TCS.NS)",
                symbol.0
            )));
        }
        Ok(symbol)
    }

    pub fn has_exchange_suffix(&self) -> bool {
        EXCHANGE_SUFFIX.is_match(&self.0)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Symbol {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_normalizes() {
        assert_eq!(Symbol::parse(" aapl ").unwrap().as_str(), "AAPL");
        assert_eq!(Symbol::parse("tcs.ns").unwrap().as_str(), "TCS.NS");
        assert_eq!(Symbol::parse("BRK-B").unwrap().as_str(), "BRK-B");
        assert_eq!(Symbol::parse("^gspc").unwrap().as_str(), "^GSPC");
    }

    #[test]
    fn test_parse_rejects_malformed() {
        for bad in ["", "   ", "AA PL", "$AAPL", ".NS", "ABCDEFGHIJKLMNOPQRSTUV"] {
            assert!(
                matches!(Symbol::parse(bad), Err(Error::InvalidSymbol(_))),
                "{bad:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_exchange_suffix() {
        assert!(Symbol::parse_with_exchange("ITC.NS").is_ok());
        assert!(Symbol::parse_with_exchange("VOD.L").is_ok());

        let err = Symbol::parse_with_exchange("AAPL").unwrap_err();
        assert!(err.to_string().contains("exchange suffix"));
    }
}
