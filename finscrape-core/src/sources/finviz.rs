//! Finviz cross-sectional stock screener.
//!
//! The screener renders 20 rows per page, addressed by row offset (r=1, 21,
//! 41, …). The total row count is probed up front from the far-out-of-range
//! offset page, which the site clamps to the last page.

use crate::collect::{collect_pages, rows_to_dataframe, CollectProgress, PageFetcher, TablePage};
use crate::error::ScrapeError;
use crate::html::{self, HtmlTable};
use crate::normalize::{normalize, NormalizeSpec};
use crate::sources::client::HttpClient;
use polars::prelude::*;

/// Index of the screener results table among the page's `<table>` elements.
const DATA_TABLE_INDEX: usize = 14;

const ROWS_PER_PAGE: usize = 20;

/// Offset probed to land on the last page.
const PROBE_OFFSET: usize = 99_999;

fn screener_url(offset: usize) -> String {
    format!("https://finviz.com/screener.ashx?v=111&r={offset}")
}

/// Row offset of the first row on a 1-based page.
fn page_offset(page: usize) -> usize {
    1 + (page - 1) * ROWS_PER_PAGE
}

struct ScreenerPages<'a> {
    client: &'a HttpClient,
    total_rows: usize,
}

impl PageFetcher for ScreenerPages<'_> {
    fn fetch_page(&self, page: usize) -> Result<TablePage, ScrapeError> {
        let offset = page_offset(page);
        if offset > self.total_rows {
            return Ok(TablePage {
                empty_marker: true,
                ..TablePage::default()
            });
        }

        let body = self.client.get_text(&screener_url(offset))?;
        // The results table carries its header as a plain first row.
        let table = html::table_at(&body, DATA_TABLE_INDEX)?.promote_header();

        Ok(TablePage {
            empty_marker: table.rows.is_empty(),
            headers: table.headers,
            rows: table.rows,
        })
    }
}

/// Find the total number of screener rows from the clamped last page.
fn probe_total_rows(client: &HttpClient) -> Result<usize, ScrapeError> {
    let body = client.get_text(&screener_url(PROBE_OFFSET))?;
    let table = html::table_at(&body, DATA_TABLE_INDEX)?.promote_header();
    total_rows_from_probe(&table)
}

/// The last row's "No." cell on the clamped last page is the total row count.
fn total_rows_from_probe(table: &HtmlTable) -> Result<usize, ScrapeError> {
    let last_row_number = table
        .rows
        .last()
        .and_then(|row| row.first())
        .ok_or_else(|| ScrapeError::FetchFailed {
            url: screener_url(PROBE_OFFSET),
            reason: "probe page has no data rows".to_string(),
        })?;

    last_row_number
        .parse()
        .map_err(|_| ScrapeError::MalformedNumber(last_row_number.clone()))
}

/// Canonical normalization for the collected screener table.
pub fn screener_normalize_spec() -> NormalizeSpec {
    NormalizeSpec {
        drop: ["No.", "P/E", "Price", "Change", "Volume"]
            .map(String::from)
            .to_vec(),
        rename: ["Ticker", "Company", "Sector", "Industry", "Country", "MarketCap"]
            .map(String::from)
            .to_vec(),
        numeric: Vec::new(),
        magnitude: vec!["MarketCap".to_string()],
        dates: Vec::new(),
        sort_by: None,
    }
}

/// Collect the full screener: company name, ticker, sector, industry,
/// country, and numeric market cap.
pub fn fetch_screener(
    client: &HttpClient,
    page_bound: usize,
    progress: &dyn CollectProgress,
) -> Result<DataFrame, ScrapeError> {
    let total_rows = probe_total_rows(client)?;
    let pages_needed = total_rows.div_ceil(ROWS_PER_PAGE);
    let bound = pages_needed.clamp(1, page_bound);

    progress.on_source_start("screener", 0, 1);
    let fetcher = ScreenerPages { client, total_rows };
    let collected = collect_pages("screener", &fetcher, bound, progress)?;
    let df = rows_to_dataframe(&collected)?;
    progress.on_source_complete("screener", 0, 1, df.height());
    progress.on_batch_complete(1, 0, 1);

    if df.height() == 0 {
        return Ok(DataFrame::empty());
    }
    normalize(df, &screener_normalize_spec())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn offsets_step_by_twenty() {
        assert_eq!(page_offset(1), 1);
        assert_eq!(page_offset(2), 21);
        assert_eq!(page_offset(5), 81);
    }

    #[test]
    fn url_carries_view_and_offset() {
        let url = screener_url(41);
        assert!(url.contains("v=111"));
        assert!(url.ends_with("r=41"));
    }

    #[test]
    fn probe_count_comes_from_last_row_number() {
        let table = HtmlTable {
            headers: ["No.", "Ticker"].map(String::from).to_vec(),
            rows: vec![
                ["8701", "ZTS"].map(String::from).to_vec(),
                ["8702", "ZYME"].map(String::from).to_vec(),
            ],
        };
        assert_eq!(total_rows_from_probe(&table).unwrap(), 8702);
    }

    #[test]
    fn rowless_probe_is_a_fetch_failure() {
        let table = HtmlTable {
            headers: ["No.", "Ticker"].map(String::from).to_vec(),
            rows: Vec::new(),
        };
        assert!(matches!(
            total_rows_from_probe(&table),
            Err(ScrapeError::FetchFailed { .. })
        ));
    }

    #[test]
    fn non_numeric_probe_cell_is_malformed() {
        let table = HtmlTable {
            headers: Vec::new(),
            rows: vec![vec!["n/a".to_string()]],
        };
        assert!(matches!(
            total_rows_from_probe(&table),
            Err(ScrapeError::MalformedNumber(cell)) if cell == "n/a"
        ));
    }

    #[test]
    fn canonical_spec_shape() {
        let spec = screener_normalize_spec();
        assert_eq!(spec.rename.len(), 6);
        assert_eq!(spec.magnitude, vec!["MarketCap".to_string()]);
        assert!(spec.sort_by.is_none());
    }

    #[test]
    fn screener_rows_normalize_end_to_end() {
        let df = df!(
            "No." => &["1", "2"],
            "Ticker" => &["A", "AA"],
            "Company" => &["Agilent", "Alcoa"],
            "Sector" => &["Healthcare", "Basic Materials"],
            "Industry" => &["Diagnostics", "Aluminum"],
            "Country" => &["USA", "USA"],
            "Market Cap" => &["44.5B", "-"],
            "P/E" => &["31.0", "5.2"],
            "Price" => &["150.00", "50.00"],
            "Change" => &["1.0%", "-0.5%"],
            "Volume" => &["1,200,000", "3,400,000"],
        )
        .unwrap();

        let out = normalize(df, &screener_normalize_spec()).unwrap();
        assert_eq!(out.width(), 6);

        let caps = out.column("MarketCap").unwrap().f64().unwrap();
        assert_eq!(caps.get(0), Some(44_500_000_000.0));
        assert!(caps.get(1).unwrap().is_nan());
    }
}
