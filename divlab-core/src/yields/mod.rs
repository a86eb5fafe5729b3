//! Yield calculator: trailing-twelve-month dividend yields and growth rates.
//!
//! Shared by every provider adapter: adapters only normalize their payloads
//! into date-ascending [`PricePoint`]s, then run one [`YieldCalculator`] pass.
//!
//! Before 12 observations exist, a single observation is annualized as if it
//! were a quarterly dividend (×4). This is an approximation, not an inference
//! of the actual payout cadence.

pub mod growth;

pub use growth::{growth_rate, GrowthStrategy, YEAR_OFFSET};

use crate::domain::{round2, PricePoint};

/// Number of trailing observations summed into the annual dividend.
pub const TRAILING_WINDOW: usize = 12;

/// Multiplier applied to a single dividend before a full window exists.
pub const QUARTERLY_ANNUALIZATION: f64 = 4.0;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct YieldCalculator {
    strategy: GrowthStrategy,
}

impl YieldCalculator {
    pub fn new(strategy: GrowthStrategy) -> Self {
        Self { strategy }
    }

    pub fn strategy(&self) -> GrowthStrategy {
        self.strategy
    }

    /// Fill the four derived fields of every point.
    ///
    /// `points` must be date-ascending. The output has the same length and
    /// order; only `dividend_yield`, `adjusted_dividend_yield`,
    /// `dividend_growth_rate` and `yield_growth_rate` differ from the input.
    pub fn calculate(&self, points: &[PricePoint]) -> Vec<PricePoint> {
        let mut out: Vec<PricePoint> = points
            .iter()
            .enumerate()
            .map(|(i, p)| {
                let annual = trailing_annual_dividend(points, i);
                PricePoint {
                    dividend_yield: yield_percent(annual, p.close),
                    adjusted_dividend_yield: yield_percent(annual, p.adjusted_close),
                    dividend_growth_rate: None,
                    yield_growth_rate: None,
                    ..p.clone()
                }
            })
            .collect();

        // Yield growth compares computed yields, so it runs as a second pass.
        for i in 0..out.len() {
            let Some(prev) = self.strategy.predecessor(&out, i) else {
                continue;
            };
            let (prior_div, prior_yield) = (out[prev].dividend, out[prev].dividend_yield);
            let current = &mut out[i];
            current.dividend_growth_rate = growth_rate(prior_div, current.dividend);
            current.yield_growth_rate = growth_rate(prior_yield, current.dividend_yield);
        }

        out
    }
}

/// Annual dividend estimate at `index`.
///
/// Sum of the trailing [`TRAILING_WINDOW`] dividends (inclusive), or the
/// current dividend ×4 while fewer than 12 observations exist.
pub fn trailing_annual_dividend(points: &[PricePoint], index: usize) -> f64 {
    if index + 1 < TRAILING_WINDOW {
        return points[index].dividend * QUARTERLY_ANNUALIZATION;
    }
    points[index + 1 - TRAILING_WINDOW..=index]
        .iter()
        .map(|p| p.dividend)
        .sum()
}

/// `annual / price × 100`, rounded to 2 decimals; 0 for non-positive prices.
pub fn yield_percent(annual_dividend: f64, price: f64) -> f64 {
    if price > 0.0 {
        round2(annual_dividend / price * 100.0)
    } else {
        0.0
    }
}

/// Builders and assertions shared by unit tests across the crate.
#[cfg(test)]
pub(crate) mod test_support {
    use chrono::NaiveDate;

    use crate::domain::PricePoint;

    /// Date-ascending monthly points: one per month from January 2015,
    /// dated the 28th, with `adjusted_close == close`.
    pub(crate) fn make_monthly_points(closes: &[f64], dividends: &[f64]) -> Vec<PricePoint> {
        assert_eq!(closes.len(), dividends.len());
        closes
            .iter()
            .zip(dividends)
            .enumerate()
            .map(|(i, (&close, &dividend))| {
                let year = 2015 + (i / 12) as i32;
                let month = (i % 12) as u32 + 1;
                let date = NaiveDate::from_ymd_opt(year, month, 28).unwrap();
                PricePoint::raw(date, close, close, close, close, close, 1_000, dividend)
            })
            .collect()
    }

    /// Assert two f64 values are approximately equal (within epsilon).
    pub(crate) fn assert_approx(actual: f64, expected: f64, epsilon: f64) {
        assert!(
            (actual - expected).abs() < epsilon,
            "assert_approx failed: actual={actual}, expected={expected}, diff={}, epsilon={epsilon}",
            (actual - expected).abs()
        );
    }
}

#[cfg(test)]
mod tests {
    use super::test_support::{assert_approx, make_monthly_points};
    use super::*;

    const EPS: f64 = 1e-9;

    fn quarterly_dividends(n: usize, amount: f64) -> Vec<f64> {
        (0..n).map(|i| if i % 3 == 2 { amount } else { 0.0 }).collect()
    }

    #[test]
    fn empty_input_gives_empty_output() {
        assert!(YieldCalculator::default().calculate(&[]).is_empty());
    }

    #[test]
    fn early_points_annualize_single_dividend() {
        let points = make_monthly_points(&[50.0, 50.0, 40.0], &[0.0, 0.0, 0.5]);
        let out = YieldCalculator::default().calculate(&points);
        assert_eq!(out[0].dividend_yield, 0.0);
        // 0.5 * 4 / 40 * 100 = 5.0
        assert_approx(out[2].dividend_yield, 5.0, EPS);
        assert_approx(out[2].adjusted_dividend_yield, 5.0, EPS);
    }

    #[test]
    fn index_eleven_uses_full_window() {
        let dividends = quarterly_dividends(12, 0.25);
        let points = make_monthly_points(&[100.0; 12], &dividends);
        let out = YieldCalculator::default().calculate(&points);
        // Index 11 sums indexes 0..=11: four payments of 0.25
        assert_approx(out[11].dividend_yield, 1.0, EPS);
        // Index 10 is still in the ×4 regime with no dividend
        assert_eq!(out[10].dividend_yield, 0.0);
    }

    #[test]
    fn trailing_window_slides() {
        let mut dividends = vec![0.1; 14];
        dividends[0] = 5.0;
        let points = make_monthly_points(&[10.0; 14], &dividends);
        assert_approx(trailing_annual_dividend(&points, 11), 6.1, EPS);
        // Index 12 window drops the 5.0 at index 0
        assert_approx(trailing_annual_dividend(&points, 12), 1.2, EPS);
    }

    #[test]
    fn adjusted_yield_uses_adjusted_close() {
        let mut points = make_monthly_points(&[100.0], &[1.0]);
        points[0].adjusted_close = 80.0;
        let out = YieldCalculator::default().calculate(&points);
        assert_approx(out[0].dividend_yield, 4.0, EPS);
        assert_approx(out[0].adjusted_dividend_yield, 5.0, EPS);
    }

    #[test]
    fn zero_prices_yield_zero() {
        let mut points = make_monthly_points(&[0.0], &[1.0]);
        points[0].adjusted_close = 0.0;
        let out = YieldCalculator::default().calculate(&points);
        assert_eq!(out[0].dividend_yield, 0.0);
        assert_eq!(out[0].adjusted_dividend_yield, 0.0);
    }

    #[test]
    fn growth_doubles_after_a_year() {
        let mut dividends = quarterly_dividends(24, 0.2);
        for d in dividends.iter_mut().skip(12) {
            *d *= 2.0;
        }
        dividends[0] = 0.2;
        dividends[12] = 0.4;
        let points = make_monthly_points(&[50.0; 24], &dividends);
        let out = YieldCalculator::default().calculate(&points);

        assert!(out[..12].iter().all(|p| p.dividend_growth_rate.is_none()));
        assert_eq!(out[12].dividend_growth_rate, Some(100.0));
        // Months with no dividend in either year emit nothing
        assert_eq!(out[13].dividend_growth_rate, None);
    }

    #[test]
    fn yield_growth_compares_computed_yields() {
        // Constant dividend, price halves in year two: trailing yield doubles.
        let mut closes = vec![100.0; 24];
        for c in closes.iter_mut().skip(12) {
            *c = 50.0;
        }
        let points = make_monthly_points(&closes, &[0.1; 24]);
        let out = YieldCalculator::default().calculate(&points);
        // index 11: 1.2 / 100 → 1.2%; index 23: 1.2 / 50 → 2.4%
        assert_approx(out[11].dividend_yield, 1.2, EPS);
        assert_approx(out[23].dividend_yield, 2.4, EPS);
        assert_eq!(out[23].yield_growth_rate, Some(100.0));
        assert_eq!(out[23].dividend_growth_rate, Some(0.0));
    }

    #[test]
    fn stopped_dividend_is_minus_hundred() {
        let mut dividends = vec![0.0; 13];
        dividends[0] = 0.3;
        let points = make_monthly_points(&[20.0; 13], &dividends);
        let out = YieldCalculator::default().calculate(&points);
        assert_eq!(out[12].dividend_growth_rate, Some(-100.0));
    }

    #[test]
    fn only_derived_fields_change() {
        let dividends = quarterly_dividends(30, 0.3);
        let closes: Vec<f64> = (0..30).map(|i| 40.0 + i as f64).collect();
        let points = make_monthly_points(&closes, &dividends);
        let out = YieldCalculator::default().calculate(&points);
        assert_eq!(out.len(), points.len());
        for (a, b) in points.iter().zip(&out) {
            assert_eq!(a.date, b.date);
            assert_eq!(a.close, b.close);
            assert_eq!(a.adjusted_close, b.adjusted_close);
            assert_eq!(a.dividend, b.dividend);
            assert_eq!(a.volume, b.volume);
        }
    }

    #[test]
    fn stale_derived_fields_are_overwritten() {
        let mut points = make_monthly_points(&[10.0, 10.0], &[0.0, 0.0]);
        points[1].dividend_yield = 99.0;
        points[1].dividend_growth_rate = Some(12.0);
        let out = YieldCalculator::default().calculate(&points);
        assert_eq!(out[1].dividend_yield, 0.0);
        assert_eq!(out[1].dividend_growth_rate, None);
    }

    #[test]
    fn nearest_strategy_tolerates_gaps() {
        // Drop February 2016 from a two-year quarterly series.
        let mut dividends = quarterly_dividends(24, 0.5);
        dividends[14] = 0.75;
        let mut points = make_monthly_points(&[30.0; 24], &dividends);
        points.remove(13);
        assert_eq!(points[13].date.to_string(), "2016-03-28");

        let nearest = YieldCalculator::new(GrowthStrategy::NearestInPriorYear).calculate(&points);
        let fixed = YieldCalculator::default().calculate(&points);

        // March 2016 vs March 2015 (0.5 → 0.75)
        assert_eq!(nearest[13].dividend_growth_rate, Some(50.0));
        // The positional offset lands on February 2015, which paid nothing
        assert_eq!(fixed[13].dividend_growth_rate, Some(100.0));

        // June 2016 vs June 2015, and vs May 2015 positionally
        assert_eq!(nearest[16].dividend_growth_rate, Some(0.0));
        assert_eq!(fixed[16].dividend_growth_rate, Some(100.0));
    }
}
