//! Period filter: trailing windows over a monthly series.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::PricePoint;

/// Trailing window selector: `1y`, `3y`, `5y`, `10y` or `max`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Period {
    #[serde(rename = "1y")]
    OneYear,
    #[serde(rename = "3y")]
    ThreeYears,
    #[serde(rename = "5y")]
    FiveYears,
    #[serde(rename = "10y")]
    TenYears,
    #[default]
    #[serde(rename = "max")]
    Max,
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown period '{0}' (expected one of 1y, 3y, 5y, 10y, max)")]
pub struct ParsePeriodError(pub String);

impl Period {
    pub const ALL: [Period; 5] = [
        Period::OneYear,
        Period::ThreeYears,
        Period::FiveYears,
        Period::TenYears,
        Period::Max,
    ];

    /// Number of monthly observations in the window; `None` for `max`.
    pub fn months(self) -> Option<usize> {
        match self {
            Period::OneYear => Some(12),
            Period::ThreeYears => Some(36),
            Period::FiveYears => Some(60),
            Period::TenYears => Some(120),
            Period::Max => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Period::OneYear => "1y",
            Period::ThreeYears => "3y",
            Period::FiveYears => "5y",
            Period::TenYears => "10y",
            Period::Max => "max",
        }
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Period {
    type Err = ParsePeriodError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Period::ALL
            .into_iter()
            .find(|p| p.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ParsePeriodError(s.to_string()))
    }
}

/// Trailing slice of `points` covering `period`.
///
/// Positional: the last `years × 12` entries, not a date cutoff. Series
/// shorter than the window are returned whole.
pub fn filter_by_period(points: &[PricePoint], period: Period) -> &[PricePoint] {
    match period.months() {
        Some(months) => &points[points.len().saturating_sub(months)..],
        None => points,
    }
}
