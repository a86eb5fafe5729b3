//! Domain types for DivLab

pub mod annual;
pub mod price_point;
pub mod stock;

pub use annual::AnnualYieldSummary;
pub use price_point::{is_date_ascending, PricePoint};
pub use stock::{StockDataModel, StockInfo};

/// Round to 2 decimal places (yields, growth rates, prices).
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Round to 4 decimal places (dividend amounts).
pub fn round4(value: f64) -> f64 {
    (value * 10_000.0).round() / 10_000.0
}
