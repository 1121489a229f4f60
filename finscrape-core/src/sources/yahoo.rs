//! Yahoo Finance price history.
//!
//! Single CSV response per ticker from the v7 download endpoint — the
//! degenerate one-page case of collection. Derived percentage-change columns
//! are attached before the frame is handed back. Batch collection skips
//! failed tickers and reports them as explicit outcomes instead of aborting.

use crate::collect::CollectProgress;
use crate::error::ScrapeError;
use crate::series;
use crate::sources::client::HttpClient;
use crate::timecode;
use polars::prelude::*;
use std::io::Cursor;

/// Bar interval code for the download endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Interval {
    Daily,
    Weekly,
    Monthly,
}

impl Interval {
    pub fn code(&self) -> &'static str {
        match self {
            Interval::Daily => "1d",
            Interval::Weekly => "1wk",
            Interval::Monthly => "1mo",
        }
    }
}

/// Date range and interval for a price-history request. Dates are
/// `mm/dd/yyyy`; the end date is inclusive.
#[derive(Debug, Clone)]
pub struct PriceQuery {
    pub start: String,
    pub end: String,
    pub interval: Interval,
}

impl Default for PriceQuery {
    fn default() -> Self {
        Self {
            start: "01/01/1900".to_string(),
            end: chrono::Local::now().format("%m/%d/%Y").to_string(),
            interval: Interval::Daily,
        }
    }
}

fn download_url(ticker: &str, start_ts: i64, end_ts: i64, interval: Interval) -> String {
    format!(
        "https://query1.finance.yahoo.com/v7/finance/download/{ticker}\
         ?period1={start_ts}&period2={end_ts}&interval={}\
         &events=history&includeAdjustedClose=true",
        interval.code()
    )
}

/// Fetch the price history for a single ticker.
///
/// Returns the CSV columns with `Ticker` prepended and `PctChange` /
/// `CumPctChange` derived from `Adj Close`. Fails loudly on any fetch or
/// parse problem.
pub fn fetch_price_history(
    client: &HttpClient,
    ticker: &str,
    query: &PriceQuery,
) -> Result<DataFrame, ScrapeError> {
    let start_ts = timecode::to_epoch_offset(&query.start, false)?;
    let end_ts = timecode::to_epoch_offset(&query.end, true)?;

    let url = download_url(ticker, start_ts, end_ts, query.interval);
    let text = client.get_text(&url)?;
    parse_price_csv(text, ticker)
}

/// Parse a price CSV body and attach the derived columns.
pub(crate) fn parse_price_csv(text: String, ticker: &str) -> Result<DataFrame, ScrapeError> {
    let df = CsvReadOptions::default()
        .with_has_header(true)
        .map_parse_options(|opts| opts.with_try_parse_dates(true))
        .into_reader_with_file_handle(Cursor::new(text.into_bytes()))
        .finish()?;

    with_derived_columns(df, ticker)
}

fn with_derived_columns(mut df: DataFrame, ticker: &str) -> Result<DataFrame, ScrapeError> {
    // "null" cells leave the column as strings; non-strict cast turns those
    // into missing values rather than failing the whole series.
    let adj: Vec<f64> = df
        .column("Adj Close")?
        .cast(&DataType::Float64)?
        .f64()?
        .iter()
        .map(|v| v.unwrap_or(f64::NAN))
        .collect();

    let height = df.height();
    df.with_column(Column::new("PctChange".into(), series::step_change(&adj)))?;
    df.with_column(Column::new(
        "CumPctChange".into(),
        series::cumulative_change(&adj),
    ))?;
    df.with_column(Column::new("Ticker".into(), vec![ticker; height]))?;

    // Ticker goes first; everything else keeps its CSV order.
    let mut order: Vec<String> = vec!["Ticker".to_string()];
    order.extend(
        df.get_column_names()
            .iter()
            .map(|s| s.to_string())
            .filter(|name| name != "Ticker"),
    );
    Ok(df.select(order)?)
}

/// Maps a ticker and query to a price-history frame. The HTTP client is the
/// real implementation; batch collection takes the trait so failure handling
/// can be exercised without a network.
pub trait PriceProvider {
    fn price_history(&self, ticker: &str, query: &PriceQuery) -> Result<DataFrame, ScrapeError>;
}

impl PriceProvider for HttpClient {
    fn price_history(&self, ticker: &str, query: &PriceQuery) -> Result<DataFrame, ScrapeError> {
        fetch_price_history(self, ticker, query)
    }
}

/// Per-ticker result of a batch collection.
#[derive(Debug)]
pub enum TickerOutcome {
    Fetched { ticker: String, rows: usize },
    Failed { ticker: String, error: ScrapeError },
}

/// Result of a multi-ticker price collection: the concatenated frame plus
/// one outcome per requested ticker.
#[derive(Debug)]
pub struct PriceBatch {
    pub prices: DataFrame,
    pub outcomes: Vec<TickerOutcome>,
}

impl PriceBatch {
    /// Tickers whose history could not be fetched. No partial rows for these
    /// are retained.
    pub fn incomplete(&self) -> Vec<&str> {
        self.outcomes
            .iter()
            .filter_map(|o| match o {
                TickerOutcome::Failed { ticker, .. } => Some(ticker.as_str()),
                TickerOutcome::Fetched { .. } => None,
            })
            .collect()
    }
}

/// Fetch price histories for multiple tickers, sequentially.
///
/// A failed ticker is skipped — collection proceeds and the failure is
/// recorded in the outcomes. Only frame-concatenation errors abort the batch.
pub fn fetch_price_histories(
    provider: &dyn PriceProvider,
    tickers: &[String],
    query: &PriceQuery,
    progress: &dyn CollectProgress,
) -> Result<PriceBatch, ScrapeError> {
    let total = tickers.len();
    let mut acc: Option<DataFrame> = None;
    let mut outcomes = Vec::with_capacity(total);

    for (i, ticker) in tickers.iter().enumerate() {
        progress.on_source_start(ticker, i, total);

        match provider.price_history(ticker, query) {
            Ok(df) => {
                let rows = df.height();
                acc = Some(match acc {
                    Some(mut frame) => {
                        frame.vstack_mut(&df)?;
                        frame
                    }
                    None => df,
                });
                progress.on_source_complete(ticker, i, total, rows);
                outcomes.push(TickerOutcome::Fetched {
                    ticker: ticker.clone(),
                    rows,
                });
            }
            Err(error) => {
                outcomes.push(TickerOutcome::Failed {
                    ticker: ticker.clone(),
                    error,
                });
            }
        }
    }

    let failed = outcomes
        .iter()
        .filter(|o| matches!(o, TickerOutcome::Failed { .. }))
        .count();
    progress.on_batch_complete(total - failed, failed, total);

    Ok(PriceBatch {
        prices: acc.unwrap_or_else(DataFrame::empty),
        outcomes,
    })
}
