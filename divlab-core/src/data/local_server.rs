//! Local REST server adapter.
//!
//! The server pages its history endpoint; only the first page is read, so
//! `local_server.page_size` bounds the history length.

use std::time::Duration;

use chrono::{Local, NaiveDate};
use serde::Deserialize;

use super::http::HttpClient;
use super::parse::{parse_iso_date, Amount};
use super::provider::{DataError, NormalizedSeries, StockDataAdapter};
use super::source::ApiSource;
use crate::config::ApiConfig;
use crate::domain::{PricePoint, StockInfo};

/// Dividends below this are treated as rounding noise.
pub const MIN_DIVIDEND: f64 = 0.0001;

const TIME_ZONE: &str = "America/New_York";
const UPDATED_PREFIX: &str = "Updated data from ";

/// One page of `/stocks/{symbol}/history/`.
#[derive(Debug, Deserialize)]
pub struct HistoryPage {
    #[serde(default)]
    metadata: Option<PageMetadata>,
    #[serde(default)]
    results: Vec<HistoryRecord>,
    #[serde(default)]
    total_pages: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct PageMetadata {
    #[serde(default)]
    message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct HistoryRecord {
    date: String,
    close: Amount,
    adj_close: Amount,
    dividend: Option<Amount>,
}

/// A fetched page plus the local date it was fetched on.
#[derive(Debug)]
pub struct LocalServerPayload {
    pub page: HistoryPage,
    pub fetched_on: NaiveDate,
}

pub struct LocalServerAdapter {
    client: HttpClient,
    base_url: String,
    page_size: u32,
}

impl LocalServerAdapter {
    pub fn new(config: &ApiConfig) -> Result<Self, DataError> {
        Ok(Self {
            client: HttpClient::new(Duration::from_secs(config.request_timeout_secs))?,
            base_url: config.local_server_base_url(),
            page_size: config.local_server.page_size,
        })
    }

    fn history_url(&self, symbol: &str) -> String {
        format!(
            "{}/stocks/{symbol}/history/?page_size={}",
            self.base_url, self.page_size
        )
    }
}

impl StockDataAdapter for LocalServerAdapter {
    type Raw = LocalServerPayload;

    const SOURCE: ApiSource = ApiSource::LocalServer;

    fn fetch_raw(&self, symbol: &str) -> Result<Self::Raw, DataError> {
        let page: HistoryPage = self.client.get_json(&self.history_url(symbol), symbol)?;
        if let Some(total) = page.total_pages.filter(|&n| n > 1) {
            tracing::warn!(
                symbol,
                total_pages = total,
                page_size = self.page_size,
                "local server has more history than one page; only the first page is used"
            );
        }
        Ok(LocalServerPayload {
            page,
            fetched_on: Local::now().date_naive(),
        })
    }

    fn normalize(&self, symbol: &str, raw: Self::Raw) -> Result<NormalizedSeries, DataError> {
        parse_history(symbol, raw)
    }
}

/// Map a history page onto an ascending series.
pub fn parse_history(symbol: &str, raw: LocalServerPayload) -> Result<NormalizedSeries, DataError> {
    let LocalServerPayload { page, fetched_on } = raw;
    if page.results.is_empty() {
        return Err(DataError::SymbolNotFound {
            symbol: symbol.to_string(),
        });
    }

    let mut points = Vec::with_capacity(page.results.len());
    for record in page.results {
        let date = parse_iso_date(&record.date).ok_or_else(|| {
            DataError::ResponseFormatChanged(format!("invalid date '{}'", record.date))
        })?;
        let close = record.close.value().unwrap_or(0.0);
        let adjusted_close = record.adj_close.value().unwrap_or(0.0);
        let dividend = record
            .dividend
            .and_then(|d| d.value())
            .filter(|&d| d >= MIN_DIVIDEND)
            .unwrap_or(0.0);
        if dividend > 0.0 {
            tracing::trace!(symbol, %date, dividend, "dividend");
        }
        points.push(PricePoint::from_close(date, close, adjusted_close, dividend));
    }

    let last_updated = page
        .metadata
        .and_then(|m| m.message)
        .as_deref()
        .and_then(updated_from)
        .unwrap_or_else(|| fetched_on.to_string());

    let info = StockInfo {
        symbol: symbol.to_string(),
        last_updated,
        time_zone: TIME_ZONE.to_string(),
    };
    Ok(NormalizedSeries::new(info, points))
}

/// `"Updated data from 2015-01-02 to 2024-05-01"` → `"2015-01-02"`.
fn updated_from(message: &str) -> Option<String> {
    let (_, rest) = message.split_once(UPDATED_PREFIX)?;
    let date = rest.split(" to ").next().unwrap_or(rest);
    Some(date.trim().to_string())
}
