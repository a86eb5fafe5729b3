//! DivLab CLI: fetch, annual and reinvest commands.
//!
//! Commands:
//! - `fetch`: fetch one symbol, compute yields, print the series for a period
//! - `annual`: annual yield summaries for one or more symbols, fetched in parallel
//! - `reinvest`: replay dividend payments through a reinvestment ledger

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

use divlab_core::{AnnualYieldSummary, ApiConfig, ApiSource, Period, PricePoint};
use divlab_runner::export::{self, write_file};
use divlab_runner::{ReinvestmentLedger, ReinvestmentSetup, StockDataService, StockReport};

#[derive(Parser)]
#[command(
    name = "divlab",
    version,
    about = "DivLab CLI: dividend yield history and reinvestment backtests"
)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace). RUST_LOG wins when set.
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Provider config file (TOML). DIVLAB_* environment variables override it.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Table,
    Json,
    Csv,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch a symbol and print its computed price series.
    Fetch {
        /// Ticker symbol (e.g., SCHD).
        symbol: String,

        /// Data provider: alpha-vantage, yahoo-finance, nasdaq, local-server.
        /// Defaults to the configured source.
        #[arg(long)]
        source: Option<ApiSource>,

        /// Trailing window: 1y, 3y, 5y, 10y, max.
        #[arg(long, default_value = "max")]
        period: Period,

        #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
        format: OutputFormat,

        /// Write the output to a file instead of stdout.
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Print annual yield summaries for one or more symbols.
    Annual {
        /// Ticker symbols (e.g., SCHD JEPI VYM).
        #[arg(required = true)]
        symbols: Vec<String>,

        #[arg(long)]
        source: Option<ApiSource>,

        #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
        format: OutputFormat,
    },
    /// Replay dividend payments through a reinvestment ledger.
    ///
    /// Rows come from --input (CSV with date,stock_price,dividend_per_share)
    /// or, without it, from the ticker's fetched history.
    Reinvest {
        #[arg(long)]
        ticker: String,

        /// Initial investment amount.
        #[arg(long)]
        investment: f64,

        /// Price paid per share for the initial investment.
        #[arg(long)]
        purchase_price: f64,

        /// CSV of payments to replay.
        #[arg(long)]
        input: Option<PathBuf>,

        /// Provider used when no --input is given.
        #[arg(long)]
        source: Option<ApiSource>,

        /// Only replay payments inside this trailing window (fetched history only).
        #[arg(long, default_value = "max")]
        period: Period,

        /// Save the ledger entries as CSV.
        #[arg(long)]
        csv: Option<PathBuf>,

        /// Save the full ledger as JSON.
        #[arg(long)]
        json: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = ApiConfig::load(cli.config.as_deref())
        .context("failed to load provider configuration")?;

    match cli.command {
        Commands::Fetch {
            symbol,
            source,
            period,
            format,
            output,
        } => run_fetch(&config, &symbol, source, period, format, output.as_deref()),
        Commands::Annual {
            symbols,
            source,
            format,
        } => run_annual(&config, &symbols, source, format),
        Commands::Reinvest {
            ticker,
            investment,
            purchase_price,
            input,
            source,
            period,
            csv,
            json,
        } => {
            let setup = ReinvestmentSetup {
                ticker,
                initial_investment: investment,
                initial_purchase_price: purchase_price,
            };
            run_reinvest(
                &config,
                setup,
                input.as_deref(),
                source,
                period,
                csv.as_deref(),
                json.as_deref(),
            )
        }
    }
}

/// Log to stderr so stdout stays clean for JSON/CSV output.
fn init_logging(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .try_init();
}

fn service_for(config: &ApiConfig, source: Option<ApiSource>) -> Result<StockDataService> {
    let source = source.unwrap_or(config.default_source);
    tracing::info!(%source, "using provider");
    Ok(StockDataService::for_source(source, config)?)
}

fn emit(text: &str, output: Option<&Path>) -> Result<()> {
    match output {
        Some(path) => {
            write_file(path, text)?;
            println!("Saved to: {}", path.display());
        }
        None => print!("{text}"),
    }
    Ok(())
}

fn run_fetch(
    config: &ApiConfig,
    symbol: &str,
    source: Option<ApiSource>,
    period: Period,
    format: OutputFormat,
    output: Option<&Path>,
) -> Result<()> {
    let service = service_for(config, source)?;
    let report = service
        .report(symbol, period)
        .with_context(|| format!("failed to fetch {symbol}"))?;

    let text = match format {
        OutputFormat::Table => format_series_table(&report),
        OutputFormat::Json => export::export_report_json(&report)? + "\n",
        OutputFormat::Csv => export::export_points_csv(&report.price_data)?,
    };
    emit(&text, output)
}

fn run_annual(
    config: &ApiConfig,
    symbols: &[String],
    source: Option<ApiSource>,
    format: OutputFormat,
) -> Result<()> {
    let service = service_for(config, source)?;
    let results = service.report_many(symbols, Period::Max);

    let mut failed = 0;
    let mut json_rows = Vec::new();
    for (symbol, result) in &results {
        let report = match result {
            Ok(report) => report,
            Err(e) => {
                eprintln!("Error for {symbol}: {e}");
                failed += 1;
                continue;
            }
        };
        match format {
            OutputFormat::Table => print!("{}", format_annual_table(report)),
            OutputFormat::Csv => {
                println!("# {}", report.info.symbol);
                print!("{}", export::export_annual_csv(&report.annual)?);
            }
            OutputFormat::Json => json_rows.push(serde_json::json!({
                "symbol": report.info.symbol,
                "source": report.source,
                "annual": report.annual,
                "annualYieldGrowth": report.annual_yield_growth,
            })),
        }
    }

    if format == OutputFormat::Json {
        println!("{}", serde_json::to_string_pretty(&json_rows)?);
    }
    if failed > 0 {
        bail!("{failed} of {} symbol(s) failed", results.len());
    }
    Ok(())
}

fn run_reinvest(
    config: &ApiConfig,
    setup: ReinvestmentSetup,
    input: Option<&Path>,
    source: Option<ApiSource>,
    period: Period,
    csv_out: Option<&Path>,
    json_out: Option<&Path>,
) -> Result<()> {
    let ledger = match input {
        Some(path) => export::load_ledger_csv(setup, path)?,
        None => {
            let service = service_for(config, source)?;
            let report = service
                .report(&setup.ticker, period)
                .with_context(|| format!("failed to fetch {}", setup.ticker))?;
            ReinvestmentLedger::from_series(setup, &report.price_data)?
        }
    };

    print!("{}", format_ledger_table(&ledger));

    if let Some(path) = csv_out {
        write_file(path, &export::export_ledger_csv(&ledger)?)?;
        println!("Ledger CSV saved to: {}", path.display());
    }
    if let Some(path) = json_out {
        export::save_ledger_json(&ledger, path)?;
        println!("Ledger JSON saved to: {}", path.display());
    }
    Ok(())
}

// ─── Table formatting ───────────────────────────────────────────────

fn fmt_growth(value: Option<f64>) -> String {
    value.map_or_else(|| "-".to_string(), |v| format!("{v:.2}%"))
}

fn format_series_table(report: &StockReport) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "{} ({}, {}) last updated {} [{}]\n",
        report.info.symbol,
        report.source,
        report.period,
        report.info.last_updated,
        report.info.time_zone
    ));
    out.push_str(&format!(
        "{:<12} {:>10} {:>10} {:>9} {:>9} {:>10} {:>10}\n",
        "Date", "Close", "Dividend", "Yield", "Adj Yield", "Div Grw", "Yield Grw"
    ));
    out.push_str(&format!("{}\n", "-".repeat(76)));
    for p in &report.price_data {
        out.push_str(&format_point_row(p));
    }
    out.push_str(&format!("{} point(s)\n", report.price_data.len()));
    out
}

fn format_point_row(p: &PricePoint) -> String {
    format!(
        "{:<12} {:>10.2} {:>10.4} {:>8.2}% {:>8.2}% {:>10} {:>10}\n",
        p.date.to_string(),
        p.close,
        p.dividend,
        p.dividend_yield,
        p.adjusted_dividend_yield,
        fmt_growth(p.dividend_growth_rate),
        fmt_growth(p.yield_growth_rate),
    )
}

fn format_annual_table(report: &StockReport) -> String {
    let mut out = String::new();
    out.push_str(&format!("\n=== {} ({}) ===\n", report.info.symbol, report.source));
    out.push_str(&format!(
        "{:<6} {:>9} {:>9} {:>6} {:>10} {:>10} {:>10}\n",
        "Year", "Yield", "Adj Yield", "Pays", "Total Div", "Avg Div", "Last Price"
    ));
    out.push_str(&format!("{}\n", "-".repeat(66)));
    for s in &report.annual {
        out.push_str(&format_annual_row(s));
    }
    out.push_str(&format!(
        "Average annual yield growth: {:.2}%\n",
        report.annual_yield_growth
    ));
    out
}

fn format_annual_row(s: &AnnualYieldSummary) -> String {
    let partial = if s.is_partial_year { "*" } else { "" };
    format!(
        "{:<6} {:>8.2}% {:>8.2}% {:>6} {:>10.4} {:>10.4} {:>10.2}\n",
        format!("{}{partial}", s.year),
        s.average_yield,
        s.adjusted_average_yield,
        s.count,
        s.total_dividend,
        s.average_dividend_per_share,
        s.last_price,
    )
}

fn format_ledger_table(ledger: &ReinvestmentLedger) -> String {
    let setup = &ledger.setup;
    let mut out = String::new();
    out.push_str("\n=== Reinvestment Ledger ===\n");
    out.push_str(&format!("Ticker:          {}\n", setup.ticker));
    out.push_str(&format!("Investment:      ${:.2}\n", setup.initial_investment));
    out.push_str(&format!("Purchase Price:  ${:.2}\n", setup.initial_purchase_price));
    out.push_str(&format!("Initial Shares:  {:.4}\n\n", ledger.initial_shares()));

    out.push_str(&format!(
        "{:<12} {:>9} {:>9} {:>10} {:>12} {:>12} {:>9}\n",
        "Date", "Price", "Dividend", "Bought", "Shares", "Value", "Yield"
    ));
    out.push_str(&format!("{}\n", "-".repeat(79)));
    for e in &ledger.entries {
        out.push_str(&format!(
            "{:<12} {:>9.2} {:>9.2} {:>10.4} {:>12.4} {:>12.2} {:>8.2}%\n",
            e.date.to_string(),
            e.stock_price,
            e.dividend,
            e.purchased_shares,
            e.shares,
            e.total_value,
            e.total_yield,
        ));
    }

    match ledger.latest() {
        Some(last) => {
            out.push_str(&format!("\nTotal Yield:     {:.2}%\n", last.total_yield));
            out.push_str(&format!("Shares Growth:   {:.2}%\n", last.shares_growth_rate));
        }
        None => out.push_str("\nNo dividend payments recorded.\n"),
    }
    out
}
