//! End-to-end pipeline test: paginated collection through normalization,
//! driven by a fake page fetcher instead of the network.

use finscrape_core::collect::{
    collect_pages, rows_to_dataframe, CollectProgress, PageFetcher, StopReason, TablePage,
    DEFAULT_PAGE_BOUND,
};
use finscrape_core::normalize::normalize;
use finscrape_core::sources::insider_normalize_spec;
use finscrape_core::ScrapeError;
use polars::prelude::*;

struct SilentProgress;
impl CollectProgress for SilentProgress {
    fn on_source_start(&self, _: &str, _: usize, _: usize) {}
    fn on_page(&self, _: &str, _: usize, _: usize) {}
    fn on_source_complete(&self, _: &str, _: usize, _: usize, _: usize) {}
    fn on_batch_complete(&self, _: usize, _: usize, _: usize) {}
}

const RAW_HEADERS: [&str; 16] = [
    "X",
    "Filing Date",
    "Trade Date",
    "Ticker",
    "Insider Name",
    "Title",
    "Trade Type",
    "Price",
    "Qty",
    "Owned",
    "ΔOwn",
    "Value",
    "1d",
    "1w",
    "1m",
    "6m",
];

fn trade_row(filing: &str, trade: &str, price: &str, qty: &str, value: &str) -> Vec<String> {
    [
        "D",
        filing,
        trade,
        "AAPL",
        "Cook Timothy",
        "CEO",
        "S - Sale",
        price,
        qty,
        "3,000,000",
        "-5%",
        value,
        "",
        "",
        "",
        "",
    ]
    .map(String::from)
    .to_vec()
}

/// One page of three distinct filings, then an empty-marker page.
struct OnePageOfTrades;

impl PageFetcher for OnePageOfTrades {
    fn fetch_page(&self, page: usize) -> Result<TablePage, ScrapeError> {
        if page > 1 {
            return Ok(TablePage {
                empty_marker: true,
                ..TablePage::default()
            });
        }
        Ok(TablePage {
            headers: RAW_HEADERS.map(String::from).to_vec(),
            rows: vec![
                trade_row("2021-03-03 16:30:00", "2021-03-02", "$120.00", "-10,000", "$1,200,000"),
                trade_row("2021-03-01 09:15:00", "2021-02-26", "$118.50", "-5,000", "$592,500"),
                trade_row("2021-03-02 12:00:00", "2021-03-01", "$119.00", "+2,500", "$297,500"),
            ],
            empty_marker: false,
        })
    }
}

#[test]
fn one_ticker_pipeline_yields_sorted_typed_frame() {
    let collected = collect_pages(
        "AAPL",
        &OnePageOfTrades,
        DEFAULT_PAGE_BOUND,
        &SilentProgress,
    )
    .unwrap();
    assert_eq!(collected.rows.len(), 3);
    assert_eq!(collected.stop, StopReason::EmptyPage);

    let raw = rows_to_dataframe(&collected).unwrap();
    assert_eq!(raw.shape(), (3, 16));

    let trades = normalize(raw, &insider_normalize_spec()).unwrap();

    assert_eq!(trades.height(), 3);
    assert_eq!(
        trades
            .get_column_names()
            .iter()
            .map(|s| s.as_str())
            .collect::<Vec<_>>(),
        vec![
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
    );

    // Typed columns.
    assert_eq!(trades.column("Price").unwrap().dtype(), &DataType::Float64);
    assert_eq!(trades.column("Qty").unwrap().dtype(), &DataType::Float64);
    assert_eq!(trades.column("Value").unwrap().dtype(), &DataType::Float64);
    assert!(matches!(
        trades.column("FilingDate").unwrap().dtype(),
        DataType::Datetime(_, _)
    ));
    assert!(matches!(
        trades.column("Date").unwrap().dtype(),
        DataType::Datetime(_, _)
    ));

    // Sorted by FilingDate ascending: 03-01, 03-02, 03-03.
    let price = trades.column("Price").unwrap().f64().unwrap();
    assert_eq!(price.get(0), Some(118.5));
    assert_eq!(price.get(1), Some(119.0));
    assert_eq!(price.get(2), Some(120.0));

    // Sign markers stripped from Qty.
    let qty = trades.column("Qty").unwrap().f64().unwrap();
    assert_eq!(qty.get(1), Some(2_500.0));

    let value = trades.column("Value").unwrap().f64().unwrap();
    assert_eq!(value.get(2), Some(1_200_000.0));
}

#[test]
fn pipeline_output_is_normalization_fixed_point() {
    let collected = collect_pages(
        "AAPL",
        &OnePageOfTrades,
        DEFAULT_PAGE_BOUND,
        &SilentProgress,
    )
    .unwrap();
    let once = normalize(
        rows_to_dataframe(&collected).unwrap(),
        &insider_normalize_spec(),
    )
    .unwrap();
    let twice = normalize(once.clone(), &insider_normalize_spec()).unwrap();

    // Debug output covers schema, dtypes, and every cell.
    assert_eq!(format!("{once:?}"), format!("{twice:?}"));
}
