//! Stock-level metadata and the normalized model handed to consumers.

use serde::{Deserialize, Serialize};

use super::PricePoint;

/// Metadata reported alongside a price series.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StockInfo {
    pub symbol: String,
    /// ISO date (`YYYY-MM-DD`) of the most recent data the provider reported.
    pub last_updated: String,
    pub time_zone: String,
}

/// A symbol's metadata plus its computed, date-ascending price series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StockDataModel {
    pub info: StockInfo,
    pub price_data: Vec<PricePoint>,
}
