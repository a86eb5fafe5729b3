//! Yahoo Finance chart adapter.
//!
//! Fetches ten years of monthly bars with dividend events from Yahoo's v8
//! chart API. Yahoo has no official API and is subject to unannounced
//! format changes; anything structurally unexpected surfaces as
//! [`DataError::ResponseFormatChanged`].

use std::collections::{BTreeMap, HashMap};
use std::time::Duration;

use serde::Deserialize;

use super::http::HttpClient;
use super::parse::unix_to_date;
use super::provider::{DataError, NormalizedSeries, StockDataAdapter};
use super::source::ApiSource;
use crate::config::ApiConfig;
use crate::domain::{PricePoint, StockInfo};

/// Yahoo Finance v8 chart API response.
#[derive(Debug, Deserialize)]
pub struct ChartResponse {
    chart: ChartResult,
}

#[derive(Debug, Deserialize)]
struct ChartResult {
    result: Option<Vec<ChartData>>,
    error: Option<ChartError>,
}

#[derive(Debug, Deserialize)]
struct ChartError {
    code: String,
    description: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ChartMeta {
    regular_market_time: Option<i64>,
    exchange_timezone_name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ChartData {
    meta: ChartMeta,
    timestamp: Option<Vec<i64>>,
    indicators: Indicators,
    events: Option<Events>,
}

#[derive(Debug, Deserialize)]
struct Indicators {
    quote: Vec<QuoteData>,
    adjclose: Option<Vec<AdjCloseData>>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct QuoteData {
    open: Vec<Option<f64>>,
    high: Vec<Option<f64>>,
    low: Vec<Option<f64>>,
    close: Vec<Option<f64>>,
    volume: Vec<Option<u64>>,
}

#[derive(Debug, Deserialize)]
struct AdjCloseData {
    adjclose: Vec<Option<f64>>,
}

#[derive(Debug, Deserialize)]
struct Events {
    dividends: Option<BTreeMap<String, DividendEvent>>,
}

#[derive(Debug, Deserialize)]
struct DividendEvent {
    date: i64,
    amount: Option<f64>,
}

pub struct YahooFinanceAdapter {
    client: HttpClient,
    base_url: String,
}

impl YahooFinanceAdapter {
    pub fn new(config: &ApiConfig) -> Result<Self, DataError> {
        Ok(Self {
            client: HttpClient::new(Duration::from_secs(config.request_timeout_secs))?,
            base_url: config.yahoo_finance.base_url.trim_end_matches('/').to_string(),
        })
    }

    fn chart_url(&self, symbol: &str) -> String {
        format!("{}/{symbol}?interval=1mo&range=10y&events=div", self.base_url)
    }
}

impl StockDataAdapter for YahooFinanceAdapter {
    type Raw = ChartResponse;

    const SOURCE: ApiSource = ApiSource::YahooFinance;

    fn fetch_raw(&self, symbol: &str) -> Result<Self::Raw, DataError> {
        self.client.get_json(&self.chart_url(symbol), symbol)
    }

    fn normalize(&self, symbol: &str, raw: Self::Raw) -> Result<NormalizedSeries, DataError> {
        parse_chart(symbol, raw)
    }
}

/// Map a chart payload onto an ascending series.
pub fn parse_chart(symbol: &str, resp: ChartResponse) -> Result<NormalizedSeries, DataError> {
    if let Some(err) = resp.chart.error {
        if err.code == "Not Found" {
            return Err(DataError::SymbolNotFound {
                symbol: symbol.to_string(),
            });
        }
        let message = err.description.unwrap_or(err.code);
        return Err(DataError::provider(ApiSource::YahooFinance, message));
    }

    let data = resp
        .chart
        .result
        .and_then(|r| r.into_iter().next())
        .ok_or_else(|| DataError::ResponseFormatChanged("result array is empty".into()))?;

    let timestamps = data.timestamp.unwrap_or_default();
    let quote = data.indicators.quote.into_iter().next().unwrap_or_default();
    let adj_closes = data
        .indicators
        .adjclose
        .and_then(|v| v.into_iter().next())
        .map(|a| a.adjclose)
        .unwrap_or_default();

    // Dividend events keyed by their exact timestamp; on a shared timestamp
    // the event with the lowest key wins.
    let mut dividends: HashMap<i64, f64> = HashMap::new();
    let events = data.events.and_then(|e| e.dividends).unwrap_or_default();
    for event in events.into_values() {
        dividends.entry(event.date).or_insert(event.amount.unwrap_or(0.0));
    }

    let mut points = Vec::with_capacity(timestamps.len());
    for (i, &ts) in timestamps.iter().enumerate() {
        let date = unix_to_date(ts).ok_or_else(|| {
            DataError::ResponseFormatChanged(format!("invalid timestamp: {ts}"))
        })?;

        let value = |v: &[Option<f64>]| v.get(i).copied().flatten().unwrap_or(0.0);
        let close = value(&quote.close);
        if close <= 0.0 {
            continue;
        }
        let adjusted = value(&adj_closes);
        let adjusted_close = if adjusted != 0.0 { adjusted } else { close };

        points.push(PricePoint::raw(
            date,
            value(&quote.open),
            value(&quote.high),
            value(&quote.low),
            close,
            adjusted_close,
            quote.volume.get(i).copied().flatten().unwrap_or(0),
            dividends.get(&ts).copied().unwrap_or(0.0),
        ));
    }

    let last_updated = data
        .meta
        .regular_market_time
        .and_then(unix_to_date)
        .map(|d| d.to_string())
        .unwrap_or_default();

    let info = StockInfo {
        symbol: symbol.to_string(),
        last_updated,
        time_zone: data.meta.exchange_timezone_name.unwrap_or_default(),
    };
    Ok(NormalizedSeries::new(info, points))
}
