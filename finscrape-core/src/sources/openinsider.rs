//! OpenInsider insider-trading filings.
//!
//! One numbered-page screener query per ticker. Each page embeds a dozen-odd
//! layout tables; the data lives at a fixed index. An exhausted page renders
//! a degenerate results table, which the fetcher reports as the empty marker.

use crate::collect::{collect_pages, rows_to_dataframe, CollectProgress, PageFetcher, TablePage};
use crate::error::ScrapeError;
use crate::html::{self, HtmlTable};
use crate::normalize::{normalize, NormalizeSpec};
use crate::sources::client::HttpClient;
use polars::prelude::*;

/// Index of the filings table among the page's `<table>` elements.
const DATA_TABLE_INDEX: usize = 11;

/// Second header cell of the results table on an exhausted page.
const EMPTY_SENTINEL: &str = "1";

fn page_url(ticker: &str, page: usize) -> String {
    format!(
        "http://openinsider.com/screener?s={ticker}&o=&pl=&ph=&ll=&lh=&fd=1461&fdr=&td=0&tdr=\
         &fdlyl=&fdlyh=&daysago=&xp=1&xs=1&xa=1&xd=1&xg=1&xf=1&xm=1&xx=1&xc=1&xw=1\
         &vl=&vh=&ocl=&och=&sic1=-1&sicl=100&sich=9999&grp=0&nfl=&nfh=&nil=&nih=\
         &nol=&noh=&v2l=&v2h=&oc2l=&oc2h=&sortcol=0&cnt=100&page={page}"
    )
}

struct InsiderPages<'a> {
    client: &'a HttpClient,
    ticker: &'a str,
}

impl PageFetcher for InsiderPages<'_> {
    fn fetch_page(&self, page: usize) -> Result<TablePage, ScrapeError> {
        let body = self.client.get_text(&page_url(self.ticker, page))?;
        let tables = html::extract_tables(&body)?;
        Ok(page_from_tables(tables))
    }
}

/// Pick the data table out of the page and decide the empty marker.
fn page_from_tables(mut tables: Vec<HtmlTable>) -> TablePage {
    if tables.len() <= DATA_TABLE_INDEX {
        return TablePage {
            empty_marker: true,
            ..TablePage::default()
        };
    }
    let table = tables.swap_remove(DATA_TABLE_INDEX);

    let exhausted = table.rows.is_empty()
        || table
            .headers
            .get(1)
            .map(|h| h == EMPTY_SENTINEL)
            .unwrap_or(true);

    TablePage {
        headers: table.headers,
        rows: table.rows,
        empty_marker: exhausted,
    }
}

/// Canonical normalization for collected filings.
pub fn insider_normalize_spec() -> NormalizeSpec {
    NormalizeSpec {
        drop: ["X", "1d", "1w", "1m", "6m"]
            .map(String::from)
            .to_vec(),
        rename: [
            "FilingDate",
            "Date",
            "Ticker",
            "InsiderName",
            "Title",
            "TradeType",
            "Price",
            "Qty",
            "Owned",
            "ChangeOwned",
            "Value",
        ]
        .map(String::from)
        .to_vec(),
        numeric: ["Price", "Qty", "Value"].map(String::from).to_vec(),
        magnitude: Vec::new(),
        dates: ["FilingDate", "Date"].map(String::from).to_vec(),
        sort_by: Some("FilingDate".to_string()),
    }
}

/// Collect and normalize insider trades for a list of tickers.
///
/// Tickers with no filings contribute nothing; a batch where every ticker is
/// empty yields an empty frame, not an error. A fetch failure mid-ticker
/// aborts the whole collection — filings are a single-resource operation.
pub fn fetch_insider_trades(
    client: &HttpClient,
    tickers: &[String],
    page_bound: usize,
    progress: &dyn CollectProgress,
) -> Result<DataFrame, ScrapeError> {
    let total = tickers.len();
    let mut acc: Option<DataFrame> = None;

    for (i, ticker) in tickers.iter().enumerate() {
        progress.on_source_start(ticker, i, total);

        let fetcher = InsiderPages { client, ticker };
        let collected = collect_pages(ticker, &fetcher, page_bound, progress)?;
        let df = rows_to_dataframe(&collected)?;
        let rows = df.height();

        if rows > 0 {
            acc = Some(match acc {
                Some(mut frame) => {
                    frame.vstack_mut(&df)?;
                    frame
                }
                None => df,
            });
        }
        progress.on_source_complete(ticker, i, total, rows);
    }
    progress.on_batch_complete(total, 0, total);

    match acc {
        Some(df) => normalize(df, &insider_normalize_spec()),
        None => Ok(DataFrame::empty()),
    }
}
