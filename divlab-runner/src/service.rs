//! Stock data service: wires a provider to the yield pipeline.
//!
//! Two entry points:
//! - `StockDataService::report()`: fetch one symbol, filter to a period and
//!   roll up annual summaries. Used by the CLI `fetch` and `annual` commands.
//! - `StockDataService::report_many()`: the same over many symbols in
//!   parallel; each symbol succeeds or fails independently.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use divlab_core::{
    aggregate_annual, annual_yield_growth, create_provider, filter_by_period, AnnualYieldSummary,
    ApiConfig, ApiSource, DataError, Period, PricePoint, StockDataModel, StockDataProvider,
    StockInfo,
};

/// Current schema version for persisted reports.
pub const SCHEMA_VERSION: u32 = 1;

/// Everything computed for one symbol.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StockReport {
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,
    pub source: ApiSource,
    pub period: Period,
    pub info: StockInfo,
    /// Points inside `period`.
    pub price_data: Vec<PricePoint>,
    /// Annual rollups over the full history, not just `period`.
    pub annual: Vec<AnnualYieldSummary>,
    /// Mean year-over-year change in `averageYield`, percent.
    pub annual_yield_growth: f64,
}

fn default_schema_version() -> u32 {
    SCHEMA_VERSION
}

impl StockReport {
    /// Build a report from an already computed model.
    pub fn from_model(source: ApiSource, model: StockDataModel, period: Period) -> Self {
        let annual = aggregate_annual(&model.price_data);
        let annual_yield_growth = annual_yield_growth(&annual);
        let price_data = filter_by_period(&model.price_data, period).to_vec();
        Self {
            schema_version: SCHEMA_VERSION,
            source,
            period,
            info: model.info,
            price_data,
            annual,
            annual_yield_growth,
        }
    }
}

pub struct StockDataService {
    provider: Box<dyn StockDataProvider>,
}

impl StockDataService {
    pub fn new(provider: Box<dyn StockDataProvider>) -> Self {
        Self { provider }
    }

    /// Service for `source`, configured from `config`.
    pub fn for_source(source: ApiSource, config: &ApiConfig) -> Result<Self, DataError> {
        Ok(Self::new(create_provider(source, config)?))
    }

    /// Swap the underlying provider.
    pub fn set_provider(&mut self, provider: Box<dyn StockDataProvider>) {
        self.provider = provider;
    }

    pub fn source(&self) -> ApiSource {
        self.provider.source()
    }

    /// Full computed history for `symbol`.
    pub fn stock_data(&self, symbol: &str) -> Result<StockDataModel, DataError> {
        let symbol = symbol.trim();
        if symbol.is_empty() {
            return Err(DataError::SymbolNotFound {
                symbol: String::new(),
            });
        }
        self.provider.fetch_stock_data(symbol)
    }

    pub fn report(&self, symbol: &str, period: Period) -> Result<StockReport, DataError> {
        let model = self.stock_data(symbol)?;
        let report = StockReport::from_model(self.source(), model, period);
        tracing::info!(
            symbol = %report.info.symbol,
            %period,
            points = report.price_data.len(),
            years = report.annual.len(),
            "report ready"
        );
        Ok(report)
    }

    /// Reports for many symbols, fetched in parallel.
    ///
    /// Output order matches `symbols`.
    pub fn report_many(
        &self,
        symbols: &[String],
        period: Period,
    ) -> Vec<(String, Result<StockReport, DataError>)> {
        symbols
            .par_iter()
            .map(|symbol| {
                let result = self.report(symbol, period);
                if let Err(e) = &result {
                    tracing::warn!(symbol = %symbol, error = %e, "fetch failed");
                }
                (symbol.clone(), result)
            })
            .collect()
    }
}
