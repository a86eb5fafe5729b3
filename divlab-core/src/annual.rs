//! Annual aggregation: one dividend rollup per calendar year.

use std::collections::{BTreeMap, BTreeSet};

use chrono::{Datelike, NaiveDate};

use crate::domain::{round2, round4, AnnualYieldSummary, PricePoint};

/// Number of distinct dividend months that makes a year complete.
pub const MONTHS_PER_YEAR: usize = 12;

#[derive(Debug, Default)]
struct YearAccumulator {
    total_dividend: f64,
    count: usize,
    months: BTreeSet<u32>,
    last: Option<(NaiveDate, f64, f64)>,
}

impl YearAccumulator {
    fn observe(&mut self, p: &PricePoint) {
        if self.last.map_or(true, |(date, _, _)| p.date > date) {
            self.last = Some((p.date, p.close, p.adjusted_close));
        }
        if p.pays_dividend() {
            self.total_dividend += p.dividend;
            self.count += 1;
            self.months.insert(p.date.month());
        }
    }

    fn summarize(self, year: String) -> AnnualYieldSummary {
        let (last_price, last_adjusted) = self.last.map_or((0.0, 0.0), |(_, c, a)| (c, a));
        let average_dps = self.total_dividend / self.count as f64;
        let yield_on = |price: f64| {
            if price > 0.0 {
                round2(average_dps / price * 100.0)
            } else {
                0.0
            }
        };

        AnnualYieldSummary {
            year,
            average_yield: yield_on(last_price),
            adjusted_average_yield: yield_on(last_adjusted),
            count: self.count,
            month_count: self.months.len(),
            is_partial_year: self.months.len() < MONTHS_PER_YEAR,
            total_dividend: round4(self.total_dividend),
            average_dividend_per_share: round4(average_dps),
            last_price: round2(last_price),
        }
    }
}

/// Collapse a series into one summary per year that paid a dividend.
///
/// The yield of a year is its average payment divided by the year's last
/// observed close. Years without any dividend are omitted; output is
/// ascending by year. Input order does not matter.
pub fn aggregate_annual(points: &[PricePoint]) -> Vec<AnnualYieldSummary> {
    let mut years: BTreeMap<String, YearAccumulator> = BTreeMap::new();
    for p in points {
        years.entry(p.year_key()).or_default().observe(p);
    }

    years
        .into_iter()
        .filter(|(_, acc)| acc.count > 0)
        .map(|(year, acc)| acc.summarize(year))
        .collect()
}

/// Mean year-over-year growth of `average_yield`, in percent.
///
/// Pairs whose earlier year has a zero yield are skipped. Returns 0 with
/// fewer than two summaries or no usable pairs.
pub fn annual_yield_growth(summaries: &[AnnualYieldSummary]) -> f64 {
    let mut sorted: Vec<&AnnualYieldSummary> = summaries.iter().collect();
    sorted.sort_by(|a, b| a.year.cmp(&b.year));

    let rates: Vec<f64> = sorted
        .windows(2)
        .filter(|w| w[0].average_yield > 0.0)
        .map(|w| (w[1].average_yield - w[0].average_yield) / w[0].average_yield * 100.0)
        .collect();

    if rates.is_empty() {
        return 0.0;
    }
    round2(rates.iter().sum::<f64>() / rates.len() as f64)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn point(date: &str, dividend: f64, close: f64) -> PricePoint {
        let date = NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap();
        PricePoint::from_close(date, close, close, dividend)
    }

    #[test]
    fn quarterly_year_rollup() {
        let points = vec![
            point("2020-01-31", 0.20, 50.0),
            point("2020-04-30", 0.20, 55.0),
            point("2020-07-31", 0.20, 52.0),
            point("2020-10-31", 0.25, 58.0),
        ];
        let out = aggregate_annual(&points);
        assert_eq!(out.len(), 1);
        let y = &out[0];
        assert_eq!(y.year, "2020");
        assert_eq!(y.count, 4);
        assert_eq!(y.month_count, 4);
        assert_eq!(y.total_dividend, 0.85);
        assert_eq!(y.average_dividend_per_share, 0.2125);
        assert_eq!(y.last_price, 58.0);
        assert_eq!(y.average_yield, 0.37);
        assert!(y.is_partial_year);
    }

    #[test]
    fn single_payment_year() {
        let out = aggregate_annual(&[point("2023-06-30", 1.0, 100.0)]);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].year, "2023");
        assert_eq!(out[0].count, 1);
        assert_eq!(out[0].total_dividend, 1.0);
        assert_eq!(out[0].average_dividend_per_share, 1.0);
        assert_eq!(out[0].average_yield, 1.0);
        assert!(out[0].is_partial_year);
    }

    #[test]
    fn years_without_dividends_are_dropped() {
        let points = vec![
            point("2019-03-29", 0.0, 40.0),
            point("2019-12-31", 0.0, 41.0),
            point("2020-03-31", 0.5, 42.0),
            point("2021-03-31", 0.0, 43.0),
        ];
        let out = aggregate_annual(&points);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].year, "2020");
    }

    #[test]
    fn last_price_comes_from_latest_date_of_year() {
        // Latest point carries no dividend but still sets the price.
        let points = vec![
            point("2021-12-31", 0.0, 80.0),
            point("2021-03-31", 0.4, 100.0),
            point("2021-06-30", 0.4, 90.0),
        ];
        let out = aggregate_annual(&points);
        assert_eq!(out[0].last_price, 80.0);
        assert_eq!(out[0].average_yield, 0.5);
    }

    #[test]
    fn zero_last_price_gives_zero_yield() {
        let out = aggregate_annual(&[point("2022-05-31", 0.3, 0.0)]);
        assert_eq!(out[0].average_yield, 0.0);
        assert_eq!(out[0].adjusted_average_yield, 0.0);
        assert_eq!(out[0].count, 1);
    }

    #[test]
    fn adjusted_yield_uses_last_adjusted_close() {
        let mut p = point("2022-05-31", 1.0, 100.0);
        p.adjusted_close = 50.0;
        let out = aggregate_annual(&[p]);
        assert_eq!(out[0].average_yield, 1.0);
        assert_eq!(out[0].adjusted_average_yield, 2.0);
    }

    #[test]
    fn monthly_payer_is_complete_year() {
        let points: Vec<_> = (1..=12)
            .map(|m| point(&format!("2018-{m:02}-15"), 0.1, 20.0))
            .collect();
        let out = aggregate_annual(&points);
        assert_eq!(out[0].month_count, 12);
        assert!(!out[0].is_partial_year);
        assert_eq!(out[0].total_dividend, 1.2);
    }

    #[test]
    fn summaries_ascend_by_year() {
        let points = vec![
            point("2022-01-31", 0.1, 10.0),
            point("2019-01-31", 0.1, 10.0),
            point("2020-01-31", 0.1, 10.0),
        ];
        let years: Vec<_> = aggregate_annual(&points).into_iter().map(|s| s.year).collect();
        assert_eq!(years, vec!["2019", "2020", "2022"]);
    }

    fn summary(year: &str, average_yield: f64) -> AnnualYieldSummary {
        AnnualYieldSummary {
            year: year.into(),
            average_yield,
            adjusted_average_yield: average_yield,
            count: 4,
            month_count: 4,
            is_partial_year: true,
            total_dividend: 1.0,
            average_dividend_per_share: 0.25,
            last_price: 100.0,
        }
    }

    #[test]
    fn yield_growth_averages_pairs() {
        let s = vec![summary("2021", 3.0), summary("2019", 2.0), summary("2020", 2.5)];
        // 2019→2020: +25%, 2020→2021: +20%
        assert_eq!(annual_yield_growth(&s), 22.5);
    }

    #[test]
    fn yield_growth_skips_zero_base() {
        let s = vec![summary("2019", 0.0), summary("2020", 2.0), summary("2021", 1.0)];
        assert_eq!(annual_yield_growth(&s), -50.0);
    }

    #[test]
    fn yield_growth_needs_two_years() {
        assert_eq!(annual_yield_growth(&[]), 0.0);
        assert_eq!(annual_yield_growth(&[summary("2020", 2.0)]), 0.0);
        assert_eq!(annual_yield_growth(&[summary("2020", 0.0), summary("2021", 2.0)]), 0.0);
    }
}
