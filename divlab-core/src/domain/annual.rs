use serde::{Deserialize, Serialize};

/// One calendar year's dividend rollup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnnualYieldSummary {
    pub year: String,
    pub average_yield: f64,
    pub adjusted_average_yield: f64,
    /// Number of dividend-paying points in the year.
    pub count: usize,
    /// Distinct months with a dividend.
    pub month_count: usize,
    pub is_partial_year: bool,
    pub total_dividend: f64,
    pub average_dividend_per_share: f64,
    pub last_price: f64,
}
