//! Provider traits and structured error types.
//!
//! Every data source is a [`StockDataAdapter`]: it fetches its own raw
//! payload and normalizes it into a date-ascending series. The yield pass is
//! shared and lives in the blanket [`StockDataProvider`] impl, so callers only
//! ever hold a `Box<dyn StockDataProvider>`.

use thiserror::Error;

use super::source::ApiSource;
use crate::domain::{PricePoint, StockDataModel, StockInfo};
use crate::yields::{GrowthStrategy, YieldCalculator};

/// Structured error types for data operations.
#[derive(Debug, Error)]
pub enum DataError {
    #[error("network unreachable: {0}")]
    NetworkUnreachable(String),

    #[error("HTTP {status}: {message}")]
    Http { status: u16, message: String },

    #[error("rate limited by provider (retry after {retry_after_secs}s)")]
    RateLimited { retry_after_secs: u64 },

    #[error("response format changed: {0}")]
    ResponseFormatChanged(String),

    #[error("{provider} error: {message}")]
    Provider { provider: String, message: String },

    #[error("symbol not found: {symbol}")]
    SymbolNotFound { symbol: String },

    #[error("unsupported API source '{0}' (expected one of alpha-vantage, yahoo-finance, nasdaq, local-server)")]
    InvalidSource(String),

    #[error("HTTP client setup failed: {0}")]
    Client(String),
}

impl DataError {
    pub(crate) fn provider(source: ApiSource, message: impl Into<String>) -> Self {
        DataError::Provider {
            provider: source.to_string(),
            message: message.into(),
        }
    }
}

/// Adapter output before the yield pass: ascending points, derived fields zero.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedSeries {
    pub info: StockInfo,
    pub points: Vec<PricePoint>,
}

impl NormalizedSeries {
    /// Sort by date and drop repeated dates, keeping the first occurrence.
    pub fn new(info: StockInfo, mut points: Vec<PricePoint>) -> Self {
        points.sort_by_key(|p| p.date);
        let before = points.len();
        points.dedup_by_key(|p| p.date);
        if points.len() != before {
            tracing::debug!(
                symbol = %info.symbol,
                dropped = before - points.len(),
                "dropped duplicate dates"
            );
        }
        Self { info, points }
    }

    /// Run the yield pass and produce the final model.
    pub fn into_model(self, strategy: GrowthStrategy) -> StockDataModel {
        let price_data = YieldCalculator::new(strategy).calculate(&self.points);
        StockDataModel {
            info: self.info,
            price_data,
        }
    }
}

/// One provider: fetch its raw payload, then map it onto [`PricePoint`]s.
///
/// `normalize` is pure so it can be exercised against recorded payloads.
pub trait StockDataAdapter: Send + Sync {
    /// Raw payload as returned by the provider.
    type Raw;

    const SOURCE: ApiSource;

    /// How `yield_growth_rate` and `dividend_growth_rate` pick their baseline.
    fn growth_strategy(&self) -> GrowthStrategy {
        GrowthStrategy::FixedOffset
    }

    fn fetch_raw(&self, symbol: &str) -> Result<Self::Raw, DataError>;

    fn normalize(&self, symbol: &str, raw: Self::Raw) -> Result<NormalizedSeries, DataError>;
}

/// Object-safe provider interface used by the service layer.
pub trait StockDataProvider: Send + Sync {
    fn source(&self) -> ApiSource;

    fn name(&self) -> &'static str {
        self.source().as_str()
    }

    /// Fetch a symbol's full monthly history with yields filled in.
    fn fetch_stock_data(&self, symbol: &str) -> Result<StockDataModel, DataError>;
}

impl<A: StockDataAdapter> StockDataProvider for A {
    fn source(&self) -> ApiSource {
        A::SOURCE
    }

    fn fetch_stock_data(&self, symbol: &str) -> Result<StockDataModel, DataError> {
        let raw = self.fetch_raw(symbol)?;
        let series = self.normalize(symbol, raw)?;
        let model = series.into_model(self.growth_strategy());
        tracing::info!(
            source = %A::SOURCE,
            symbol,
            points = model.price_data.len(),
            "fetched stock data"
        );
        Ok(model)
    }
}
