//! FinScrape CLI — scrape market data into CSV tables.
//!
//! Commands:
//! - `prices` — daily price history for one or more tickers, with derived
//!   percentage-change columns and a per-ticker outcome report
//! - `insider` — insider-trading filings for one or more tickers
//! - `screener` — the full cross-sectional screener table

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use finscrape_core::sources::yahoo::{Interval, PriceQuery, TickerOutcome};
use finscrape_core::sources::{fetch_insider_trades, fetch_price_histories, fetch_screener};
use finscrape_core::{HttpClient, ScrapeConfig, StdoutProgress};
use polars::prelude::{CsvWriter, DataFrame, SerWriter};
use std::fs::File;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "finscrape", about = "FinScrape CLI — stock market data scraper")]
struct Cli {
    /// Path to a TOML config file (user agent, timeout, page bound).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch price history for one or more tickers.
    Prices {
        /// Tickers to fetch (e.g., AAPL TSLA F).
        #[arg(required = true)]
        tickers: Vec<String>,

        /// Start date (mm/dd/yyyy). Defaults to 01/01/1900.
        #[arg(long)]
        start: Option<String>,

        /// End date (mm/dd/yyyy), inclusive. Defaults to today.
        #[arg(long)]
        end: Option<String>,

        /// Bar interval.
        #[arg(long, value_enum, default_value_t = IntervalArg::Daily)]
        interval: IntervalArg,

        /// Output CSV path for the price table.
        #[arg(long, default_value = "prices.csv")]
        out: PathBuf,

        /// Optional CSV path for the per-ticker outcome report.
        #[arg(long)]
        report: Option<PathBuf>,
    },
    /// Fetch insider-trading filings for one or more tickers.
    Insider {
        /// Tickers to fetch.
        #[arg(required = true)]
        tickers: Vec<String>,

        /// Output CSV path for the filings table.
        #[arg(long, default_value = "insider.csv")]
        out: PathBuf,
    },
    /// Fetch the full stock screener table.
    Screener {
        /// Output CSV path for the screener table.
        #[arg(long, default_value = "screener.csv")]
        out: PathBuf,
    },
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum IntervalArg {
    Daily,
    Weekly,
    Monthly,
}

impl From<IntervalArg> for Interval {
    fn from(arg: IntervalArg) -> Self {
        match arg {
            IntervalArg::Daily => Interval::Daily,
            IntervalArg::Weekly => Interval::Weekly,
            IntervalArg::Monthly => Interval::Monthly,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => ScrapeConfig::from_file(path)
            .with_context(|| format!("load config {}", path.display()))?,
        None => ScrapeConfig::default(),
    };
    let client = HttpClient::new(&config);

    match cli.command {
        Commands::Prices {
            tickers,
            start,
            end,
            interval,
            out,
            report,
        } => run_prices(&client, tickers, start, end, interval, &out, report.as_deref()),
        Commands::Insider { tickers, out } => {
            run_insider(&client, &config, tickers, &out)
        }
        Commands::Screener { out } => run_screener(&client, &config, &out),
    }
}

fn run_prices(
    client: &HttpClient,
    tickers: Vec<String>,
    start: Option<String>,
    end: Option<String>,
    interval: IntervalArg,
    out: &Path,
    report: Option<&Path>,
) -> Result<()> {
    let defaults = PriceQuery::default();
    let query = PriceQuery {
        start: start.unwrap_or(defaults.start),
        end: end.unwrap_or(defaults.end),
        interval: interval.into(),
    };

    let mut batch = fetch_price_histories(client, &tickers, &query, &StdoutProgress)?;

    let incomplete = batch.incomplete();
    if !incomplete.is_empty() {
        println!("Incomplete tickers: {}", incomplete.join(", "));
    }

    write_frame_csv(&mut batch.prices, out)?;
    println!("Wrote {} rows to {}", batch.prices.height(), out.display());

    if let Some(path) = report {
        write_outcome_report(&batch.outcomes, path)?;
        println!("Wrote outcome report to {}", path.display());
    }
    Ok(())
}

fn run_insider(
    client: &HttpClient,
    config: &ScrapeConfig,
    tickers: Vec<String>,
    out: &Path,
) -> Result<()> {
    let mut trades = fetch_insider_trades(client, &tickers, config.page_bound, &StdoutProgress)?;
    write_frame_csv(&mut trades, out)?;
    println!("Wrote {} insider trades to {}", trades.height(), out.display());
    Ok(())
}

fn run_screener(client: &HttpClient, config: &ScrapeConfig, out: &Path) -> Result<()> {
    let mut table = fetch_screener(client, config.page_bound, &StdoutProgress)?;
    write_frame_csv(&mut table, out)?;
    println!("Wrote {} screener rows to {}", table.height(), out.display());
    Ok(())
}

fn write_frame_csv(df: &mut DataFrame, path: &Path) -> Result<()> {
    let file =
        File::create(path).with_context(|| format!("create output file {}", path.display()))?;
    CsvWriter::new(file)
        .finish(df)
        .with_context(|| format!("write CSV {}", path.display()))?;
    Ok(())
}

/// Export the per-ticker batch outcomes: one row per requested ticker.
///
/// Columns: ticker, status, rows, error
fn write_outcome_report(outcomes: &[TickerOutcome], path: &Path) -> Result<()> {
    let file =
        File::create(path).with_context(|| format!("create report file {}", path.display()))?;
    let mut wtr = csv::Writer::from_writer(file);

    wtr.write_record(["ticker", "status", "rows", "error"])?;
    for outcome in outcomes {
        match outcome {
            TickerOutcome::Fetched { ticker, rows } => {
                let rows = rows.to_string();
                wtr.write_record([ticker.as_str(), "fetched", rows.as_str(), ""])?;
            }
            TickerOutcome::Failed { ticker, error } => {
                let reason = error.to_string();
                wtr.write_record([ticker.as_str(), "failed", "0", reason.as_str()])?;
            }
        }
    }
    wtr.flush()?;
    Ok(())
}
