//! Year-over-year growth rules and predecessor lookup.

use chrono::Datelike;
use serde::{Deserialize, Serialize};

use crate::domain::{round2, PricePoint};

/// How the "same point one year earlier" is located.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GrowthStrategy {
    /// The point exactly 12 positions earlier (monthly series).
    #[default]
    FixedOffset,
    /// The point in the previous calendar year closest by month/day.
    ///
    /// Distance is `|Δmonth| * 30 + |Δday|`; ties go to the earliest point.
    /// Used for sources whose series can have gaps or non-monthly cadence.
    NearestInPriorYear,
}

/// Positional distance used by [`GrowthStrategy::FixedOffset`].
pub const YEAR_OFFSET: usize = 12;

impl GrowthStrategy {
    /// Index of the point that `points[index]` is compared against, if any.
    pub fn predecessor(self, points: &[PricePoint], index: usize) -> Option<usize> {
        match self {
            GrowthStrategy::FixedOffset => index.checked_sub(YEAR_OFFSET),
            GrowthStrategy::NearestInPriorYear => nearest_in_prior_year(points, index),
        }
    }
}

fn nearest_in_prior_year(points: &[PricePoint], index: usize) -> Option<usize> {
    let current = points.get(index)?.date;
    let target_year = current.year() - 1;

    let mut closest = None;
    let mut min_diff = i64::MAX;
    for (i, p) in points.iter().enumerate() {
        if p.date.year() != target_year {
            continue;
        }
        let diff = (p.date.month() as i64 - current.month() as i64).abs() * 30
            + (p.date.day() as i64 - current.day() as i64).abs();
        if diff < min_diff {
            min_diff = diff;
            closest = Some(i);
        }
    }
    closest
}

/// Growth from `prior` to `current`, in percent.
///
/// - dividend started (0 → positive): +100
/// - dividend stopped (positive → 0): −100
/// - both positive: rounded relative change
/// - both zero: no growth rate
pub fn growth_rate(prior: f64, current: f64) -> Option<f64> {
    if prior > 0.0 {
        if current == 0.0 {
            Some(-100.0)
        } else {
            Some(round2((current - prior) / prior * 100.0))
        }
    } else if prior == 0.0 && current > 0.0 {
        Some(100.0)
    } else {
        None
    }
}
