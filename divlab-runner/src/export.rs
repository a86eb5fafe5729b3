//! Export: JSON and CSV artifacts for reports and reinvestment ledgers.
//!
//! - **JSON**: full round-trip serialization with schema versioning
//! - **CSV**: price series, annual summaries and ledger entries for
//!   spreadsheets, plus import of `date,stock_price,dividend_per_share` rows
//!
//! Persisted JSON carries a `schemaVersion` field. Newer versions are rejected
//! on load.

use std::io::Read;
use std::path::Path;

use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use serde::Deserialize;

use divlab_core::{AnnualYieldSummary, PricePoint};

use crate::reinvest::{ReinvestmentLedger, ReinvestmentSetup};
use crate::service::{StockReport, SCHEMA_VERSION};

fn check_schema(version: u32, what: &str) -> Result<()> {
    if version > SCHEMA_VERSION {
        bail!(
            "unsupported {what} schema version {version} (max supported: {SCHEMA_VERSION})"
        );
    }
    Ok(())
}

fn optional(value: Option<f64>) -> String {
    value.map(|v| format!("{v:.2}")).unwrap_or_default()
}

// ─── JSON ───────────────────────────────────────────────────────────

pub fn export_report_json(report: &StockReport) -> Result<String> {
    serde_json::to_string_pretty(report).context("failed to serialize StockReport to JSON")
}

/// Deserialize a `StockReport`, rejecting newer schema versions.
pub fn import_report_json(json: &str) -> Result<StockReport> {
    let report: StockReport =
        serde_json::from_str(json).context("failed to deserialize StockReport from JSON")?;
    check_schema(report.schema_version, "report")?;
    Ok(report)
}

pub fn export_ledger_json(ledger: &ReinvestmentLedger) -> Result<String> {
    serde_json::to_string_pretty(ledger)
        .context("failed to serialize ReinvestmentLedger to JSON")
}

/// Deserialize a `ReinvestmentLedger`, rejecting newer schema versions and
/// invalid setups.
pub fn import_ledger_json(json: &str) -> Result<ReinvestmentLedger> {
    let ledger: ReinvestmentLedger = serde_json::from_str(json)
        .context("failed to deserialize ReinvestmentLedger from JSON")?;
    check_schema(ledger.schema_version, "ledger")?;
    ledger.setup.validate()?;
    Ok(ledger)
}

// ─── CSV export ─────────────────────────────────────────────────────

/// Export a computed price series.
///
/// Columns: date, open, high, low, close, adjusted_close, volume, dividend,
/// dividend_yield, adjusted_dividend_yield, dividend_growth_rate,
/// yield_growth_rate. Growth columns are empty when not computed.
pub fn export_points_csv(points: &[PricePoint]) -> Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);

    wtr.write_record([
        "date",
        "open",
        "high",
        "low",
        "close",
        "adjusted_close",
        "volume",
        "dividend",
        "dividend_yield",
        "adjusted_dividend_yield",
        "dividend_growth_rate",
        "yield_growth_rate",
    ])?;

    for p in points {
        wtr.write_record([
            &p.date.to_string(),
            &format!("{:.4}", p.open),
            &format!("{:.4}", p.high),
            &format!("{:.4}", p.low),
            &format!("{:.4}", p.close),
            &format!("{:.4}", p.adjusted_close),
            &p.volume.to_string(),
            &format!("{:.4}", p.dividend),
            &format!("{:.2}", p.dividend_yield),
            &format!("{:.2}", p.adjusted_dividend_yield),
            &optional(p.dividend_growth_rate),
            &optional(p.yield_growth_rate),
        ])?;
    }

    let data = wtr.into_inner().context("failed to flush CSV writer")?;
    String::from_utf8(data).context("CSV output is not valid UTF-8")
}

/// Export annual summaries, one row per year.
pub fn export_annual_csv(summaries: &[AnnualYieldSummary]) -> Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);
    wtr.write_record([
        "year",
        "average_yield",
        "adjusted_average_yield",
        "count",
        "month_count",
        "is_partial_year",
        "total_dividend",
        "average_dividend_per_share",
        "last_price",
    ])?;
    for s in summaries {
        wtr.write_record([
            &s.year,
            &format!("{:.2}", s.average_yield),
            &format!("{:.2}", s.adjusted_average_yield),
            &s.count.to_string(),
            &s.month_count.to_string(),
            &s.is_partial_year.to_string(),
            &format!("{:.4}", s.total_dividend),
            &format!("{:.4}", s.average_dividend_per_share),
            &format!("{:.2}", s.last_price),
        ])?;
    }
    let data = wtr.into_inner().context("failed to flush CSV writer")?;
    String::from_utf8(data).context("CSV output is not valid UTF-8")
}

/// Export ledger entries.
///
/// The first three columns are the ledger inputs and are written at full
/// precision, so the file can be fed back through [`import_ledger_rows`].
pub fn export_ledger_csv(ledger: &ReinvestmentLedger) -> Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);
    wtr.write_record([
        "date",
        "stock_price",
        "dividend_per_share",
        "dividend",
        "purchased_shares",
        "shares",
        "total_value",
        "total_yield",
        "shares_growth_rate",
    ])?;
    for e in &ledger.entries {
        wtr.write_record([
            &e.date.to_string(),
            &e.stock_price.to_string(),
            &e.dividend_per_share.to_string(),
            &format!("{:.2}", e.dividend),
            &format!("{:.6}", e.purchased_shares),
            &format!("{:.6}", e.shares),
            &format!("{:.2}", e.total_value),
            &format!("{:.2}", e.total_yield),
            &format!("{:.2}", e.shares_growth_rate),
        ])?;
    }
    let data = wtr.into_inner().context("failed to flush CSV writer")?;
    String::from_utf8(data).context("CSV output is not valid UTF-8")
}

// ─── CSV import ─────────────────────────────────────────────────────

/// One input row for a ledger replay. Extra columns are ignored.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct LedgerRow {
    pub date: NaiveDate,
    pub stock_price: f64,
    pub dividend_per_share: f64,
}

/// Read `date,stock_price,dividend_per_share` rows (with a header line).
pub fn read_ledger_rows<R: Read>(reader: R) -> Result<Vec<LedgerRow>> {
    let mut rdr = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);
    rdr.deserialize()
        .enumerate()
        .map(|(i, row)| row.with_context(|| format!("invalid ledger row {}", i + 1)))
        .collect()
}

/// Replay a CSV of ledger rows into a fresh ledger.
pub fn import_ledger_rows<R: Read>(setup: ReinvestmentSetup, reader: R) -> Result<ReinvestmentLedger> {
    let rows = read_ledger_rows(reader)?;
    let ledger = ReinvestmentLedger::replay(
        setup,
        rows.into_iter()
            .map(|r| (r.date, r.stock_price, r.dividend_per_share)),
    )?;
    Ok(ledger)
}

// ─── Files ──────────────────────────────────────────────────────────

/// Write `contents` to `path`, creating parent directories.
pub fn write_file(path: &Path, contents: &str) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create directory: {}", parent.display()))?;
    }
    std::fs::write(path, contents)
        .with_context(|| format!("failed to write {}", path.display()))
}

pub fn save_ledger_json(ledger: &ReinvestmentLedger, path: &Path) -> Result<()> {
    write_file(path, &export_ledger_json(ledger)?)
}

pub fn load_ledger_json(path: &Path) -> Result<ReinvestmentLedger> {
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    import_ledger_json(&json)
}

pub fn save_report_json(report: &StockReport, path: &Path) -> Result<()> {
    write_file(path, &export_report_json(report)?)
}

pub fn load_report_json(path: &Path) -> Result<StockReport> {
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    import_report_json(&json)
}

/// Open a ledger CSV file and replay it.
pub fn load_ledger_csv(setup: ReinvestmentSetup, path: &Path) -> Result<ReinvestmentLedger> {
    let file = std::fs::File::open(path)
        .with_context(|| format!("failed to open {}", path.display()))?;
    import_ledger_rows(setup, file)
}
