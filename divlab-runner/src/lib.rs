//! DivLab Runner: fetch orchestration, reinvestment ledger and export.
//!
//! This crate builds on `divlab-core` to provide:
//! - A stock data service that fetches, filters and rolls up one or many symbols
//! - A dividend reinvestment (DRIP) ledger with 15% withholding
//! - JSON and CSV export/import with schema versioning

pub mod export;
pub mod reinvest;
pub mod service;

pub use export::{
    export_annual_csv, export_ledger_csv, export_ledger_json, export_points_csv,
    export_report_json, import_ledger_json, import_ledger_rows, import_report_json, LedgerRow,
};
pub use reinvest::{
    LedgerError, ReinvestmentEntry, ReinvestmentLedger, ReinvestmentSetup, WITHHOLDING_NET_FACTOR,
};
pub use service::{StockDataService, StockReport, SCHEMA_VERSION};
