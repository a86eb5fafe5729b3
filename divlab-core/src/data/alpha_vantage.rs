//! Alpha Vantage monthly-adjusted adapter.
//!
//! One request for the full history. The payload is a date-keyed map of
//! string-valued bars; business errors come back as HTTP 200 with an
//! `"Error Message"`, `"Note"` or `"Information"` key instead of data.

use std::collections::BTreeMap;
use std::time::Duration;

use serde::Deserialize;

use super::http::HttpClient;
use super::parse::{parse_amount, parse_iso_date};
use super::provider::{DataError, NormalizedSeries, StockDataAdapter};
use super::source::ApiSource;
use crate::config::ApiConfig;
use crate::domain::{PricePoint, StockInfo};

/// `TIME_SERIES_MONTHLY_ADJUSTED` response.
#[derive(Debug, Deserialize)]
pub struct MonthlyAdjustedResponse {
    #[serde(rename = "Meta Data")]
    meta: Option<MetaData>,
    #[serde(rename = "Monthly Adjusted Time Series")]
    series: Option<BTreeMap<String, MonthlyBar>>,
    #[serde(rename = "Error Message")]
    error_message: Option<String>,
    #[serde(rename = "Note")]
    note: Option<String>,
    #[serde(rename = "Information")]
    information: Option<String>,
}

#[derive(Debug, Deserialize)]
struct MetaData {
    #[serde(rename = "2. Symbol")]
    symbol: String,
    #[serde(rename = "3. Last Refreshed")]
    last_refreshed: String,
    #[serde(rename = "4. Time Zone")]
    time_zone: String,
}

#[derive(Debug, Deserialize)]
struct MonthlyBar {
    #[serde(rename = "1. open")]
    open: String,
    #[serde(rename = "2. high")]
    high: String,
    #[serde(rename = "3. low")]
    low: String,
    #[serde(rename = "4. close")]
    close: String,
    #[serde(rename = "5. adjusted close")]
    adjusted_close: String,
    #[serde(rename = "6. volume")]
    volume: String,
    #[serde(rename = "7. dividend amount")]
    dividend: String,
}

pub struct AlphaVantageAdapter {
    client: HttpClient,
    base_url: String,
    api_key: String,
}

impl AlphaVantageAdapter {
    pub fn new(config: &ApiConfig) -> Result<Self, DataError> {
        Ok(Self {
            client: HttpClient::new(Duration::from_secs(config.request_timeout_secs))?,
            base_url: config.alpha_vantage.base_url.clone(),
            api_key: config.alpha_vantage.api_key.clone(),
        })
    }

    fn url(&self, symbol: &str) -> String {
        format!(
            "{}?function=TIME_SERIES_MONTHLY_ADJUSTED&symbol={symbol}&outputsize=full&apikey={}",
            self.base_url, self.api_key
        )
    }
}

impl StockDataAdapter for AlphaVantageAdapter {
    type Raw = MonthlyAdjustedResponse;

    const SOURCE: ApiSource = ApiSource::AlphaVantage;

    fn fetch_raw(&self, symbol: &str) -> Result<Self::Raw, DataError> {
        if self.api_key.is_empty() {
            tracing::warn!("alpha vantage API key is empty");
        }
        self.client.get_json(&self.url(symbol), symbol)
    }

    fn normalize(&self, _symbol: &str, raw: Self::Raw) -> Result<NormalizedSeries, DataError> {
        normalize_monthly_adjusted(raw)
    }
}

/// Map a monthly-adjusted payload onto an ascending series.
pub fn normalize_monthly_adjusted(
    raw: MonthlyAdjustedResponse,
) -> Result<NormalizedSeries, DataError> {
    if let Some(msg) = raw.error_message.or(raw.note).or(raw.information) {
        return Err(DataError::provider(ApiSource::AlphaVantage, msg));
    }

    let meta = raw
        .meta
        .ok_or_else(|| DataError::ResponseFormatChanged("missing 'Meta Data'".into()))?;
    let series = raw.series.ok_or_else(|| {
        DataError::ResponseFormatChanged("missing 'Monthly Adjusted Time Series'".into())
    })?;

    let mut points = Vec::with_capacity(series.len());
    for (date, bar) in series {
        let date = parse_iso_date(&date).ok_or_else(|| {
            DataError::ResponseFormatChanged(format!("invalid date key '{date}'"))
        })?;
        let num = |s: &str| parse_amount(s).unwrap_or(0.0);
        points.push(PricePoint::raw(
            date,
            num(&bar.open),
            num(&bar.high),
            num(&bar.low),
            num(&bar.close),
            num(&bar.adjusted_close),
            num(&bar.volume).max(0.0) as u64,
            num(&bar.dividend),
        ));
    }

    let info = StockInfo {
        symbol: meta.symbol,
        last_updated: meta.last_refreshed,
        time_zone: meta.time_zone,
    };
    Ok(NormalizedSeries::new(info, points))
}
