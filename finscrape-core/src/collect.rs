//! Bounded page-by-page table collection.
//!
//! The collector pulls numbered pages from a `PageFetcher` until the source
//! signals an empty result, a page contributes nothing new, or the page bound
//! is hit. Duplicate detection is global across the whole accumulator, so it
//! also absorbs rows reintroduced by retried requests. The incoming page is
//! diffed against the accumulator *before* appending, keeping "page empty"
//! and "page entirely duplicate" as independent stop reasons.

use crate::error::ScrapeError;
use polars::prelude::*;
use std::collections::HashSet;

/// Hard ceiling on pages fetched per logical source. Protects against a
/// misbehaving source that never signals exhaustion.
pub const DEFAULT_PAGE_BOUND: usize = 100;

/// One raw page of tabular data. The fetcher decides `empty_marker` from
/// whatever source-specific sentinel marks an exhausted result set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TablePage {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
    pub empty_marker: bool,
}

/// Maps a 1-based page number to raw page content. Implemented per source;
/// the transport layer behind it is opaque to the collector.
pub trait PageFetcher {
    fn fetch_page(&self, page: usize) -> Result<TablePage, ScrapeError>;
}

/// Progress observer for collection runs. A side effect only — nothing in
/// the data contract depends on these callbacks.
pub trait CollectProgress: Send {
    /// Called before collection starts for a source in a batch.
    fn on_source_start(&self, source: &str, index: usize, total: usize);

    /// Called after each appended page with the running row count.
    fn on_page(&self, source: &str, page: usize, rows_collected: usize);

    /// Called when one source finishes.
    fn on_source_complete(&self, source: &str, index: usize, total: usize, rows: usize);

    /// Called when the whole batch is done.
    fn on_batch_complete(&self, succeeded: usize, failed: usize, total: usize);
}

/// Progress reporter that prints to stdout.
pub struct StdoutProgress;

impl CollectProgress for StdoutProgress {
    fn on_source_start(&self, source: &str, index: usize, total: usize) {
        let pct = 100.0 * (index + 1) as f64 / total.max(1) as f64;
        println!("{pct:.2}% Complete");
        println!("Source: {source}");
    }

    fn on_page(&self, source: &str, _page: usize, rows_collected: usize) {
        println!("{source}: {rows_collected} rows collected");
    }

    fn on_source_complete(&self, source: &str, _index: usize, _total: usize, rows: usize) {
        println!("  OK: {source} ({rows} rows)");
    }

    fn on_batch_complete(&self, succeeded: usize, failed: usize, total: usize) {
        println!("\nCollection complete: {succeeded}/{total} succeeded, {failed} failed");
    }
}

/// Why a collection run stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// The source signalled an empty result (or returned a page with no rows).
    EmptyPage,
    /// The incoming page contributed no rows not already in the accumulator.
    DuplicatePage,
    /// The page bound was reached without a termination signal.
    PageLimit,
}

/// Accumulated rows from one logical source.
#[derive(Debug, Clone)]
pub struct Collected {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
    pub stop: StopReason,
}

impl Collected {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Collect pages from `fetcher` until a termination condition fires.
///
/// Sources that return zero valid pages yield an empty `Collected`, not an
/// error. Fetch failures abort collection for this source.
pub fn collect_pages(
    source: &str,
    fetcher: &dyn PageFetcher,
    page_bound: usize,
    progress: &dyn CollectProgress,
) -> Result<Collected, ScrapeError> {
    let mut headers: Vec<String> = Vec::new();
    let mut rows: Vec<Vec<String>> = Vec::new();
    let mut seen: HashSet<Vec<String>> = HashSet::new();
    let mut stop = StopReason::PageLimit;

    for page in 1..=page_bound {
        let fetched = fetcher.fetch_page(page)?;

        if fetched.empty_marker || fetched.rows.is_empty() {
            stop = StopReason::EmptyPage;
            break;
        }

        if headers.is_empty() {
            headers = fetched.headers;
        }

        let novel: Vec<Vec<String>> = fetched
            .rows
            .into_iter()
            .filter(|row| !seen.contains(row))
            .collect();

        if novel.is_empty() {
            stop = StopReason::DuplicatePage;
            break;
        }

        for row in novel {
            seen.insert(row.clone());
            rows.push(row);
        }

        progress.on_page(source, page, rows.len());
    }

    Ok(Collected { headers, rows, stop })
}

/// Turn collected rows into a string-typed DataFrame, one column per header.
///
/// Rows whose cell count does not match the header count are skipped — ragged
/// rows come from layout tables leaking into the data table.
pub fn rows_to_dataframe(collected: &Collected) -> Result<DataFrame, ScrapeError> {
    if collected.headers.is_empty() {
        return Ok(DataFrame::empty());
    }

    let width = collected.headers.len();
    let mut columns: Vec<Vec<&str>> = vec![Vec::new(); width];
    for row in &collected.rows {
        if row.len() != width {
            continue;
        }
        for (i, cell) in row.iter().enumerate() {
            columns[i].push(cell.as_str());
        }
    }

    let cols: Vec<Column> = collected
        .headers
        .iter()
        .zip(columns)
        .map(|(name, values)| Column::new(name.as_str().into(), values))
        .collect();

    Ok(DataFrame::new(cols)?)
}
