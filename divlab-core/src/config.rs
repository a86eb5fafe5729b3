//! Provider configuration.
//!
//! Built once at startup (TOML file, then `DIVLAB_*` environment overrides)
//! and passed by reference into adapter constructors.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::data::ApiSource;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("read config file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("parse config TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("invalid value for {key}: '{value}'")]
    InvalidEnv { key: String, value: String },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    pub default_source: ApiSource,
    /// Route NASDAQ and local-server requests through `proxy_base_url`.
    pub use_proxy: bool,
    pub proxy_base_url: String,
    pub request_timeout_secs: u64,
    pub alpha_vantage: AlphaVantageConfig,
    pub yahoo_finance: YahooFinanceConfig,
    pub nasdaq: NasdaqConfig,
    pub local_server: LocalServerConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AlphaVantageConfig {
    pub api_key: String,
    pub base_url: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct YahooFinanceConfig {
    pub base_url: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NasdaqConfig {
    pub base_url: String,
    pub asset_class: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LocalServerConfig {
    pub base_url: String,
    pub page_size: u32,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            default_source: ApiSource::Nasdaq,
            use_proxy: false,
            proxy_base_url: "http://127.0.0.1:3000/api".into(),
            request_timeout_secs: 30,
            alpha_vantage: AlphaVantageConfig::default(),
            yahoo_finance: YahooFinanceConfig::default(),
            nasdaq: NasdaqConfig::default(),
            local_server: LocalServerConfig::default(),
        }
    }
}

impl Default for AlphaVantageConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: "https://www.alphavantage.co/query".into(),
        }
    }
}

impl Default for YahooFinanceConfig {
    fn default() -> Self {
        Self {
            base_url: "https://query1.finance.yahoo.com/v8/finance/chart".into(),
        }
    }
}

impl Default for NasdaqConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.nasdaq.com/api/quote".into(),
            asset_class: "etf".into(),
        }
    }
}

impl Default for LocalServerConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:8000/api".into(),
            page_size: 400,
        }
    }
}

impl ApiConfig {
    /// Load from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml(&content)
    }

    /// Parse from a TOML string. Missing keys take their defaults.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Optional file, then process environment overrides.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let base = match path {
            Some(p) => Self::from_file(p)?,
            None => Self::default(),
        };
        base.with_env(|key| std::env::var(key).ok())
    }

    /// Apply `DIVLAB_*` overrides read through `lookup`.
    pub fn with_env<F>(mut self, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(v) = lookup("DIVLAB_DEFAULT_SOURCE") {
            self.default_source = v.parse().map_err(|_| invalid("DIVLAB_DEFAULT_SOURCE", &v))?;
        }
        if let Some(v) = lookup("DIVLAB_USE_PROXY") {
            // Anything but an explicit "false" enables the proxy.
            self.use_proxy = !v.trim().eq_ignore_ascii_case("false");
        }
        if let Some(v) = lookup("DIVLAB_PROXY_BASE_URL") {
            self.proxy_base_url = v;
        }
        if let Some(v) = lookup("DIVLAB_ALPHA_VANTAGE_API_KEY") {
            self.alpha_vantage.api_key = v;
        }
        if let Some(v) = lookup("DIVLAB_ALPHA_VANTAGE_BASE_URL") {
            self.alpha_vantage.base_url = v;
        }
        if let Some(v) = lookup("DIVLAB_YAHOO_FINANCE_BASE_URL") {
            self.yahoo_finance.base_url = v;
        }
        if let Some(v) = lookup("DIVLAB_NASDAQ_BASE_URL") {
            self.nasdaq.base_url = v;
        }
        if let Some(v) = lookup("DIVLAB_NASDAQ_ASSET_CLASS") {
            self.nasdaq.asset_class = v;
        }
        if let Some(v) = lookup("DIVLAB_LOCAL_API_URL") {
            self.local_server.base_url = v;
        }
        if let Some(v) = lookup("DIVLAB_LOCAL_API_PAGE_SIZE") {
            self.local_server.page_size = v
                .trim()
                .parse()
                .map_err(|_| invalid("DIVLAB_LOCAL_API_PAGE_SIZE", &v))?;
        }
        Ok(self)
    }

    /// Base URL for NASDAQ quote requests, honoring the proxy toggle.
    pub fn nasdaq_base_url(&self) -> String {
        if self.use_proxy {
            format!("{}/nasdaq", self.proxy_base_url.trim_end_matches('/'))
        } else {
            self.nasdaq.base_url.trim_end_matches('/').to_string()
        }
    }

    /// Base URL for local-server requests, honoring the proxy toggle.
    pub fn local_server_base_url(&self) -> String {
        let base = if self.use_proxy {
            &self.proxy_base_url
        } else {
            &self.local_server.base_url
        };
        base.trim_end_matches('/').to_string()
    }
}

fn invalid(key: &str, value: &str) -> ConfigError {
    ConfigError::InvalidEnv {
        key: key.to_string(),
        value: value.to_string(),
    }
}
