//! Provider identifiers.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::provider::DataError;

/// The closed set of supported data providers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ApiSource {
    AlphaVantage,
    YahooFinance,
    #[default]
    Nasdaq,
    LocalServer,
}

impl ApiSource {
    pub const ALL: [ApiSource; 4] = [
        ApiSource::AlphaVantage,
        ApiSource::YahooFinance,
        ApiSource::Nasdaq,
        ApiSource::LocalServer,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ApiSource::AlphaVantage => "alpha-vantage",
            ApiSource::YahooFinance => "yahoo-finance",
            ApiSource::Nasdaq => "nasdaq",
            ApiSource::LocalServer => "local-server",
        }
    }
}

impl fmt::Display for ApiSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ApiSource {
    type Err = DataError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ApiSource::ALL
            .into_iter()
            .find(|src| src.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| DataError::InvalidSource(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tags_roundtrip() {
        for src in ApiSource::ALL {
            assert_eq!(src.to_string().parse::<ApiSource>().unwrap(), src);
        }
    }

    #[test]
    fn tags_parse_case_insensitively() {
        assert_eq!(
            " Yahoo-Finance ".parse::<ApiSource>().unwrap(),
            ApiSource::YahooFinance
        );
        assert_eq!("NASDAQ".parse::<ApiSource>().unwrap(), ApiSource::Nasdaq);
        assert_eq!(
            "Local-Server".parse::<ApiSource>().unwrap(),
            ApiSource::LocalServer
        );
    }

    #[test]
    fn unknown_tag_is_error() {
        match "bloomberg".parse::<ApiSource>() {
            Err(DataError::InvalidSource(s)) => assert_eq!(s, "bloomberg"),
            other => panic!("expected InvalidSource, got {other:?}"),
        }
    }

    #[test]
    fn serde_matches_display() {
        let json = serde_json::to_string(&ApiSource::LocalServer).unwrap();
        assert_eq!(json, "\"local-server\"");
    }
}
