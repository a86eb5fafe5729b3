//! Dividend reinvestment (DRIP) ledger.
//!
//! Each entry records one payment: the net dividend on the shares held so far
//! buys more shares at that entry's price. Entries are appended in the order
//! they are recorded; the ledger never reorders them.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use divlab_core::domain::round2;
use divlab_core::PricePoint;

use crate::service::SCHEMA_VERSION;

/// Share of a gross dividend left after the 15% withholding tax.
pub const WITHHOLDING_NET_FACTOR: f64 = 0.85;

#[derive(Debug, Error, PartialEq)]
pub enum LedgerError {
    #[error("invalid setup: {0}")]
    InvalidSetup(String),

    #[error("stock price on {date} must be positive, got {price}")]
    NonPositivePrice { date: NaiveDate, price: f64 },

    #[error("dividend per share on {date} must not be negative, got {dividend}")]
    NegativeDividend { date: NaiveDate, dividend: f64 },
}

// ─── Calculators ────────────────────────────────────────────────────

/// Net dividend on `shares` after withholding, rounded to cents.
pub fn net_dividend(shares: f64, dividend_per_share: f64) -> f64 {
    round2(shares * dividend_per_share * WITHHOLDING_NET_FACTOR)
}

/// Shares bought with `amount` at `price`. Fractional shares are allowed.
pub fn purchase_shares(amount: f64, price: f64) -> f64 {
    amount / price
}

/// Return on `investment`, percent, rounded to 2 decimals.
pub fn evaluation_yield(value: f64, investment: f64) -> f64 {
    round2((value / investment - 1.0) * 100.0)
}

/// Growth of the share count over the initial purchase, percent.
pub fn shares_growth_rate(shares: f64, initial_shares: f64) -> f64 {
    (shares / initial_shares - 1.0) * 100.0
}

// ─── Ledger types ───────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReinvestmentSetup {
    pub ticker: String,
    pub initial_investment: f64,
    pub initial_purchase_price: f64,
}

impl ReinvestmentSetup {
    pub fn validate(&self) -> Result<(), LedgerError> {
        if self.ticker.trim().is_empty() {
            return Err(LedgerError::InvalidSetup("ticker is empty".into()));
        }
        if !(self.initial_investment > 0.0 && self.initial_investment.is_finite()) {
            return Err(LedgerError::InvalidSetup(format!(
                "initial investment must be positive, got {}",
                self.initial_investment
            )));
        }
        if !(self.initial_purchase_price > 0.0 && self.initial_purchase_price.is_finite()) {
            return Err(LedgerError::InvalidSetup(format!(
                "initial purchase price must be positive, got {}",
                self.initial_purchase_price
            )));
        }
        Ok(())
    }

    /// Shares bought with the initial investment.
    pub fn initial_shares(&self) -> f64 {
        purchase_shares(self.initial_investment, self.initial_purchase_price)
    }
}

/// One dividend payment and the resulting position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReinvestmentEntry {
    pub date: NaiveDate,
    pub stock_price: f64,
    pub dividend_per_share: f64,
    /// Shares bought with this payment's net dividend.
    pub purchased_shares: f64,
    /// Shares held after reinvesting.
    pub shares: f64,
    /// Net dividend after withholding.
    pub dividend: f64,
    pub total_value: f64,
    pub total_yield: f64,
    pub shares_growth_rate: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReinvestmentLedger {
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,
    pub setup: ReinvestmentSetup,
    pub entries: Vec<ReinvestmentEntry>,
    pub created_at: DateTime<Utc>,
}

fn default_schema_version() -> u32 {
    SCHEMA_VERSION
}

impl ReinvestmentLedger {
    pub fn new(setup: ReinvestmentSetup) -> Result<Self, LedgerError> {
        setup.validate()?;
        Ok(Self {
            schema_version: SCHEMA_VERSION,
            setup,
            entries: Vec::new(),
            created_at: Utc::now(),
        })
    }

    pub fn initial_shares(&self) -> f64 {
        self.setup.initial_shares()
    }

    /// Shares held before the next payment.
    pub fn current_shares(&self) -> f64 {
        self.entries
            .last()
            .map_or_else(|| self.initial_shares(), |e| e.shares)
    }

    pub fn latest(&self) -> Option<&ReinvestmentEntry> {
        self.entries.last()
    }

    /// Reinvest one payment of `dividend_per_share` at `stock_price`.
    pub fn record(
        &mut self,
        date: NaiveDate,
        stock_price: f64,
        dividend_per_share: f64,
    ) -> Result<&ReinvestmentEntry, LedgerError> {
        if !(stock_price > 0.0 && stock_price.is_finite()) {
            return Err(LedgerError::NonPositivePrice {
                date,
                price: stock_price,
            });
        }
        if !(dividend_per_share >= 0.0 && dividend_per_share.is_finite()) {
            return Err(LedgerError::NegativeDividend {
                date,
                dividend: dividend_per_share,
            });
        }

        let held = self.current_shares();
        let dividend = net_dividend(held, dividend_per_share);
        let purchased_shares = purchase_shares(dividend, stock_price);
        let shares = held + purchased_shares;
        let total_value = shares * stock_price;

        let index = self.entries.len();
        self.entries.push(ReinvestmentEntry {
            date,
            stock_price,
            dividend_per_share,
            purchased_shares,
            shares,
            dividend,
            total_value,
            total_yield: evaluation_yield(total_value, self.setup.initial_investment),
            shares_growth_rate: shares_growth_rate(shares, self.initial_shares()),
        });
        Ok(&self.entries[index])
    }

    /// Build a ledger by recording each `(date, price, dividend)` row in order.
    pub fn replay<I>(setup: ReinvestmentSetup, rows: I) -> Result<Self, LedgerError>
    where
        I: IntoIterator<Item = (NaiveDate, f64, f64)>,
    {
        let mut ledger = Self::new(setup)?;
        for (date, price, dividend) in rows {
            ledger.record(date, price, dividend)?;
        }
        Ok(ledger)
    }

    /// Replay every dividend-paying point of a computed series at its close.
    pub fn from_series(setup: ReinvestmentSetup, points: &[PricePoint]) -> Result<Self, LedgerError> {
        let rows = points
            .iter()
            .filter(|p| p.pays_dividend())
            .map(|p| (p.date, p.close, p.dividend));
        let ledger = Self::replay(setup, rows)?;
        tracing::debug!(
            ticker = %ledger.setup.ticker,
            entries = ledger.entries.len(),
            "ledger replayed from series"
        );
        Ok(ledger)
    }
}
