//! Provider adapters and selection.

pub mod alpha_vantage;
pub mod http;
pub mod local_server;
pub mod nasdaq;
pub mod parse;
pub mod provider;
pub mod source;
pub mod yahoo;

pub use alpha_vantage::AlphaVantageAdapter;
pub use local_server::LocalServerAdapter;
pub use nasdaq::NasdaqAdapter;
pub use provider::{DataError, NormalizedSeries, StockDataAdapter, StockDataProvider};
pub use source::ApiSource;
pub use yahoo::YahooFinanceAdapter;

use crate::config::ApiConfig;

/// Build the adapter for `source`, configured from `config`.
pub fn create_provider(
    source: ApiSource,
    config: &ApiConfig,
) -> Result<Box<dyn StockDataProvider>, DataError> {
    tracing::debug!(%source, use_proxy = config.use_proxy, "creating provider");
    let provider: Box<dyn StockDataProvider> = match source {
        ApiSource::AlphaVantage => Box::new(AlphaVantageAdapter::new(config)?),
        ApiSource::YahooFinance => Box::new(YahooFinanceAdapter::new(config)?),
        ApiSource::Nasdaq => Box::new(NasdaqAdapter::new(config)?),
        ApiSource::LocalServer => Box::new(LocalServerAdapter::new(config)?),
    };
    Ok(provider)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn factory_covers_every_source() {
        let config = ApiConfig::default();
        for source in ApiSource::ALL {
            let provider = create_provider(source, &config).unwrap();
            assert_eq!(provider.source(), source);
            assert_eq!(provider.name(), source.as_str());
        }
    }
}
