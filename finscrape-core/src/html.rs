//! HTML table extraction.
//!
//! Source pages embed many `<table>` elements (layout chrome included); each
//! source knows the fixed index of its data table. Cell text is
//! whitespace-collapsed and `-` cells are kept verbatim — NA handling belongs
//! to the normalizer.

use crate::error::ScrapeError;
use scraper::{ElementRef, Html, Selector};

/// One extracted `<table>`: header cells from the first `<th>` row (empty if
/// the table has none) and the `<td>` rows.
#[derive(Debug, Clone, Default)]
pub struct HtmlTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl HtmlTable {
    /// Promote the first data row to the header row. Screener tables render
    /// their header as a plain `<td>` row.
    pub fn promote_header(mut self) -> Self {
        if self.headers.is_empty() && !self.rows.is_empty() {
            self.headers = self.rows.remove(0);
        }
        self
    }
}

/// Extract every `<table>` in document order.
pub fn extract_tables(html: &str) -> Result<Vec<HtmlTable>, ScrapeError> {
    let doc = Html::parse_document(html);

    let sel_table = selector("table")?;
    let sel_tr = selector("tr")?;
    let sel_th = selector("th")?;
    let sel_td = selector("td")?;

    let mut tables = Vec::new();
    for table in doc.select(&sel_table) {
        // Descendant selection crosses into nested tables; keep only the
        // cells whose nearest <table> ancestor is this one.
        let mut headers: Vec<String> = Vec::new();
        for tr in table.select(&sel_tr).filter(|tr| in_table(*tr, table)) {
            let ths: Vec<String> = tr
                .select(&sel_th)
                .filter(|th| in_table(*th, table))
                .map(|th| norm_text(&th.text().collect::<String>()))
                .collect();
            if !ths.is_empty() {
                headers = ths;
                break;
            }
        }

        let mut rows: Vec<Vec<String>> = Vec::new();
        for tr in table.select(&sel_tr).filter(|tr| in_table(*tr, table)) {
            let cells: Vec<String> = tr
                .select(&sel_td)
                .filter(|td| in_table(*td, table))
                .map(|td| norm_text(&td.text().collect::<String>()))
                .collect();
            if !cells.is_empty() {
                rows.push(cells);
            }
        }

        tables.push(HtmlTable { headers, rows });
    }

    Ok(tables)
}

/// True when `el`'s nearest `<table>` ancestor is `table` itself.
fn in_table(el: ElementRef, table: ElementRef) -> bool {
    el.ancestors()
        .filter_map(ElementRef::wrap)
        .find(|a| a.value().name() == "table")
        .map(|a| a.id() == table.id())
        .unwrap_or(false)
}

/// Extract the table at a fixed index, erroring when the page has fewer.
pub fn table_at(html: &str, index: usize) -> Result<HtmlTable, ScrapeError> {
    let mut tables = extract_tables(html)?;
    let count = tables.len();
    if index >= count {
        return Err(ScrapeError::TableNotFound { index, count });
    }
    Ok(tables.swap_remove(index))
}

fn selector(css: &str) -> Result<Selector, ScrapeError> {
    Selector::parse(css).map_err(|e| ScrapeError::Config(format!("selector '{css}': {e}")))
}

/// Collapse runs of whitespace and trim.
fn norm_text(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut prev_space = false;
    for ch in s.chars() {
        if ch.is_whitespace() {
            if !prev_space {
                out.push(' ');
                prev_space = true;
            }
        } else {
            out.push(ch);
            prev_space = false;
        }
    }
    out.trim().to_string()
}
