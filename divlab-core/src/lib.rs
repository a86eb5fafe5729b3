//! DivLab Core: price/dividend model, provider adapters and the yield pipeline.
//!
//! This crate contains the pure heart of the pipeline:
//! - Domain types (price points, stock metadata, annual summaries)
//! - Provider adapters that normalize Alpha Vantage, Yahoo Finance, NASDAQ
//!   and local-server payloads into one point format
//! - The shared trailing-twelve-month yield calculator and growth strategies
//! - Annual aggregation and trailing period filtering
//! - Provider configuration (TOML plus environment overrides)

pub mod annual;
pub mod config;
pub mod data;
pub mod domain;
pub mod period;
pub mod yields;

pub use annual::{aggregate_annual, annual_yield_growth};
pub use config::{ApiConfig, ConfigError};
pub use data::{create_provider, ApiSource, DataError, StockDataProvider};
pub use domain::{AnnualYieldSummary, PricePoint, StockDataModel, StockInfo};
pub use period::{filter_by_period, ParsePeriodError, Period};
pub use yields::{GrowthStrategy, YieldCalculator};

#[cfg(test)]
mod tests {
    use super::*;

    /// Compile-time check: pipeline types are Send + Sync.
    ///
    /// The CLI fans symbols out over a thread pool; if any type fails this
    /// check, the build breaks immediately.
    #[allow(dead_code)]
    fn assert_send_sync() {
        fn require_send<T: Send>() {}
        fn require_sync<T: Sync>() {}

        // Domain types
        require_send::<PricePoint>();
        require_sync::<PricePoint>();
        require_send::<StockDataModel>();
        require_sync::<StockDataModel>();
        require_send::<AnnualYieldSummary>();
        require_sync::<AnnualYieldSummary>();

        // Pipeline
        require_send::<YieldCalculator>();
        require_sync::<YieldCalculator>();
        require_send::<ApiConfig>();
        require_sync::<ApiConfig>();
        require_send::<Box<dyn StockDataProvider>>();
        require_sync::<Box<dyn StockDataProvider>>();

        // Adapters
        require_send::<data::AlphaVantageAdapter>();
        require_sync::<data::AlphaVantageAdapter>();
        require_send::<data::YahooFinanceAdapter>();
        require_sync::<data::YahooFinanceAdapter>();
        require_send::<data::NasdaqAdapter>();
        require_sync::<data::NasdaqAdapter>();
        require_send::<data::LocalServerAdapter>();
        require_sync::<data::LocalServerAdapter>();

        // Errors cross thread boundaries in parallel fetches
        require_send::<DataError>();
        require_sync::<DataError>();
    }
}
