//! Field-level parsing shared by the adapters.
//!
//! Providers disagree on number formatting (`"12.5"`, `"$12.50"`,
//! `"1,234,567"`, bare JSON numbers) and on date formats (`YYYY-MM-DD`,
//! `MM/DD/YYYY`, Unix seconds).

use chrono::{DateTime, NaiveDate};
use serde::Deserialize;

/// A numeric field that may arrive as a JSON number or a string.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum Amount {
    Number(f64),
    Text(String),
}

impl Amount {
    pub fn value(&self) -> Option<f64> {
        match self {
            Amount::Number(n) => Some(*n).filter(|n| n.is_finite()),
            Amount::Text(s) => parse_amount(s),
        }
    }
}

/// Parse a decimal string, ignoring `$`, thousands separators and whitespace.
///
/// Returns `None` for empty, `"N/A"` and other non-numeric input.
pub fn parse_amount(s: &str) -> Option<f64> {
    let cleaned: String = s
        .chars()
        .filter(|c| !matches!(c, '$' | ',') && !c.is_whitespace())
        .collect();
    cleaned.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Parse an ISO `YYYY-MM-DD` date.
pub fn parse_iso_date(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").ok()
}

/// Parse a US-style `MM/DD/YYYY` date, falling back to ISO.
pub fn parse_us_date(s: &str) -> Option<NaiveDate> {
    let parts: Vec<&str> = s.trim().split('/').collect();
    if let [month, day, year] = parts.as_slice() {
        return NaiveDate::from_ymd_opt(year.parse().ok()?, month.parse().ok()?, day.parse().ok()?);
    }
    parse_iso_date(s)
}

/// UTC calendar date of a Unix timestamp in seconds.
pub fn unix_to_date(ts: i64) -> Option<NaiveDate> {
    DateTime::from_timestamp(ts, 0).map(|dt| dt.naive_utc().date())
}
