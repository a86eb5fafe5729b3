//! NASDAQ quote API adapter.
//!
//! Two requests per symbol: the price history and the dividend history,
//! joined on the calendar date. NASDAQ reports no adjusted close, so
//! `adjusted_close == close`. Its history can have irregular spacing, hence
//! the date-based [`GrowthStrategy::NearestInPriorYear`].

use std::collections::HashMap;
use std::time::Duration;

use chrono::{Local, Months, NaiveDate};
use serde::Deserialize;

use super::http::HttpClient;
use super::parse::{parse_amount, parse_us_date};
use super::provider::{DataError, NormalizedSeries, StockDataAdapter};
use super::source::ApiSource;
use crate::config::ApiConfig;
use crate::domain::{PricePoint, StockInfo};
use crate::yields::GrowthStrategy;

const TIME_ZONE: &str = "America/New_York";
const HISTORY_YEARS: u32 = 30;
const HISTORY_LIMIT: u32 = 99_999;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Status {
    r_code: Option<i64>,
    b_code_message: Option<serde_json::Value>,
}

/// `/{symbol}/historical` response.
#[derive(Debug, Deserialize)]
pub struct HistoricalResponse {
    data: Option<HistoricalData>,
    status: Option<Status>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct HistoricalData {
    trades_table: Option<Table<TradeRow>>,
}

#[derive(Debug, Deserialize)]
struct Table<R> {
    rows: Option<Vec<R>>,
}

#[derive(Debug, Deserialize)]
struct TradeRow {
    date: String,
    #[serde(default)]
    close: Option<String>,
    #[serde(default)]
    volume: Option<String>,
    #[serde(default)]
    open: Option<String>,
    #[serde(default)]
    high: Option<String>,
    #[serde(default)]
    low: Option<String>,
}

/// `/{symbol}/dividends` response.
#[derive(Debug, Deserialize)]
pub struct DividendsResponse {
    data: Option<DividendsData>,
    status: Option<Status>,
}

#[derive(Debug, Deserialize)]
struct DividendsData {
    dividends: Option<Table<DividendRow>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DividendRow {
    ex_or_eff_date: String,
    #[serde(default)]
    amount: Option<String>,
}

/// Both responses plus the local date they were fetched on.
#[derive(Debug)]
pub struct NasdaqPayload {
    pub prices: HistoricalResponse,
    pub dividends: DividendsResponse,
    pub fetched_on: NaiveDate,
}

pub struct NasdaqAdapter {
    client: HttpClient,
    base_url: String,
    asset_class: String,
}

impl NasdaqAdapter {
    pub fn new(config: &ApiConfig) -> Result<Self, DataError> {
        Ok(Self {
            client: HttpClient::new(Duration::from_secs(config.request_timeout_secs))?,
            base_url: config.nasdaq_base_url(),
            asset_class: config.nasdaq.asset_class.clone(),
        })
    }

    pub fn historical_url(&self, symbol: &str, from: NaiveDate, to: NaiveDate) -> String {
        format!(
            "{}/{symbol}/historical?assetclass={}&fromdate={from}&todate={to}&limit={HISTORY_LIMIT}",
            self.base_url, self.asset_class
        )
    }

    pub fn dividends_url(&self, symbol: &str) -> String {
        format!("{}/{symbol}/dividends?assetclass={}", self.base_url, self.asset_class)
    }
}

impl StockDataAdapter for NasdaqAdapter {
    type Raw = NasdaqPayload;

    const SOURCE: ApiSource = ApiSource::Nasdaq;

    fn growth_strategy(&self) -> GrowthStrategy {
        GrowthStrategy::NearestInPriorYear
    }

    fn fetch_raw(&self, symbol: &str) -> Result<Self::Raw, DataError> {
        let today = Local::now().date_naive();
        let from = today
            .checked_sub_months(Months::new(HISTORY_YEARS * 12))
            .unwrap_or(today);

        let prices = self
            .client
            .get_json(&self.historical_url(symbol, from, today), symbol)?;
        let dividends = self.client.get_json(&self.dividends_url(symbol), symbol)?;
        Ok(NasdaqPayload {
            prices,
            dividends,
            fetched_on: today,
        })
    }

    fn normalize(&self, symbol: &str, raw: Self::Raw) -> Result<NormalizedSeries, DataError> {
        parse_nasdaq(symbol, raw)
    }
}

/// Join price and dividend histories into an ascending series.
pub fn parse_nasdaq(symbol: &str, raw: NasdaqPayload) -> Result<NormalizedSeries, DataError> {
    check_status(raw.prices.status.as_ref())?;
    check_status(raw.dividends.status.as_ref())?;

    let price_rows = raw
        .prices
        .data
        .and_then(|d| d.trades_table)
        .and_then(|t| t.rows)
        .ok_or_else(|| DataError::ResponseFormatChanged("invalid price data structure".into()))?;
    let dividend_rows = raw
        .dividends
        .data
        .and_then(|d| d.dividends)
        .and_then(|t| t.rows)
        .ok_or_else(|| {
            DataError::ResponseFormatChanged("invalid dividend data structure".into())
        })?;

    // Later rows win on a repeated date.
    let mut dividends: HashMap<NaiveDate, f64> = HashMap::new();
    for row in dividend_rows {
        let Some(date) = parse_us_date(&row.ex_or_eff_date) else {
            tracing::debug!(symbol, date = %row.ex_or_eff_date, "skipping dividend row");
            continue;
        };
        dividends.insert(date, number(row.amount.as_deref()));
    }

    let mut points = Vec::with_capacity(price_rows.len());
    for row in price_rows {
        let date = parse_us_date(&row.date).ok_or_else(|| {
            DataError::ResponseFormatChanged(format!("invalid date '{}'", row.date))
        })?;
        let close = number(row.close.as_deref());
        points.push(PricePoint::raw(
            date,
            number(row.open.as_deref()),
            number(row.high.as_deref()),
            number(row.low.as_deref()),
            close,
            close,
            number(row.volume.as_deref()).max(0.0) as u64,
            dividends.get(&date).copied().unwrap_or(0.0),
        ));
    }

    let mut series = NormalizedSeries::new(
        StockInfo {
            symbol: symbol.to_string(),
            last_updated: String::new(),
            time_zone: TIME_ZONE.to_string(),
        },
        points,
    );
    series.info.last_updated = series
        .points
        .last()
        .map_or(raw.fetched_on, |p| p.date)
        .to_string();
    Ok(series)
}

fn number(field: Option<&str>) -> f64 {
    field.and_then(parse_amount).unwrap_or(0.0)
}

fn check_status(status: Option<&Status>) -> Result<(), DataError> {
    let Some(status) = status else {
        return Ok(());
    };
    let Some(code) = status.r_code.filter(|&c| c != 200) else {
        return Ok(());
    };
    let message = match &status.b_code_message {
        None | Some(serde_json::Value::Null) => return Ok(()),
        Some(msg) => msg
            .get(0)
            .and_then(|m| m.get("errorMessage"))
            .and_then(|m| m.as_str())
            .map(str::to_string)
            .unwrap_or_else(|| msg.to_string()),
    };
    Err(DataError::provider(
        ApiSource::Nasdaq,
        format!("{message} (rCode {code})"),
    ))
}
