//! PricePoint: one observation of price and dividend data.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

/// Price and dividend data for a single calendar date.
///
/// Adapters create points with the four derived fields zeroed/unset; the
/// yield calculator fills them in exactly once.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PricePoint {
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub adjusted_close: f64,
    pub volume: u64,
    /// Per-share cash dividend paid on or around this date (0 when none).
    pub dividend: f64,
    /// Trailing-twelve-month yield on `close`, percent.
    pub dividend_yield: f64,
    /// Trailing-twelve-month yield on `adjusted_close`, percent.
    pub adjusted_dividend_yield: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dividend_growth_rate: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub yield_growth_rate: Option<f64>,
}

impl PricePoint {
    /// A point with no derived fields computed yet.
    #[allow(clippy::too_many_arguments)]
    pub fn raw(
        date: NaiveDate,
        open: f64,
        high: f64,
        low: f64,
        close: f64,
        adjusted_close: f64,
        volume: u64,
        dividend: f64,
    ) -> Self {
        Self {
            date,
            open,
            high,
            low,
            close,
            adjusted_close,
            volume,
            dividend,
            dividend_yield: 0.0,
            adjusted_dividend_yield: 0.0,
            dividend_growth_rate: None,
            yield_growth_rate: None,
        }
    }

    /// A point for sources that only report a close: open/high/low are
    /// backfilled from `close`, volume is 0.
    pub fn from_close(date: NaiveDate, close: f64, adjusted_close: f64, dividend: f64) -> Self {
        Self::raw(date, close, close, close, close, adjusted_close, 0, dividend)
    }

    pub fn pays_dividend(&self) -> bool {
        self.dividend > 0.0
    }

    /// Four-digit calendar year, the grouping key for annual rollups.
    pub fn year_key(&self) -> String {
        format!("{:04}", self.date.year())
    }
}

/// Returns true if `points` is strictly ascending by date (no duplicates).
pub fn is_date_ascending(points: &[PricePoint]) -> bool {
    points.windows(2).all(|w| w[0].date < w[1].date)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_point() -> PricePoint {
        PricePoint::raw(
            NaiveDate::from_ymd_opt(2024, 3, 28).unwrap(),
            100.0,
            105.0,
            98.0,
            103.0,
            101.5,
            50_000,
            0.42,
        )
    }

    #[test]
    fn raw_point_has_no_derived_fields() {
        let p = sample_point();
        assert_eq!(p.dividend_yield, 0.0);
        assert_eq!(p.adjusted_dividend_yield, 0.0);
        assert!(p.dividend_growth_rate.is_none());
        assert!(p.yield_growth_rate.is_none());
    }

    #[test]
    fn from_close_backfills_ohl() {
        let p = PricePoint::from_close(NaiveDate::from_ymd_opt(2024, 1, 31).unwrap(), 50.0, 49.0, 0.0);
        assert_eq!(p.open, 50.0);
        assert_eq!(p.high, 50.0);
        assert_eq!(p.low, 50.0);
        assert_eq!(p.adjusted_close, 49.0);
        assert_eq!(p.volume, 0);
        assert!(!p.pays_dividend());
    }

    #[test]
    fn year_key_is_four_digits() {
        assert_eq!(sample_point().year_key(), "2024");
    }

    #[test]
    fn serializes_camel_case_and_iso_date() {
        let json = serde_json::to_value(sample_point()).unwrap();
        assert_eq!(json["date"], "2024-03-28");
        assert_eq!(json["adjustedClose"], 101.5);
        assert!(json.get("dividendGrowthRate").is_none());
    }

    #[test]
    fn detects_unsorted_series() {
        let a = sample_point();
        let mut b = sample_point();
        b.date = NaiveDate::from_ymd_opt(2024, 2, 29).unwrap();
        assert!(is_date_ascending(&[b.clone(), a.clone()]));
        assert!(!is_date_ascending(&[a.clone(), b]));
        assert!(!is_date_ascending(&[a.clone(), a]));
    }
}
