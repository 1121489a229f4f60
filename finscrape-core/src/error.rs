//! Structured error types for scraping and normalization.
//!
//! Malformed source data (dates, numbers, schemas) fails loudly to the
//! immediate caller; transport failures carry the URL so batch drivers can
//! report which source broke.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScrapeError {
    #[error("malformed date '{input}': {reason}")]
    MalformedDate { input: String, reason: String },

    #[error("malformed number: '{0}'")]
    MalformedNumber(String),

    #[error("unrecognized magnitude suffix '{suffix}' in '{input}'")]
    UnknownSuffix { suffix: char, input: String },

    #[error("column count mismatch: rename list has {expected} names, table has {found} columns")]
    ColumnCountMismatch { expected: usize, found: usize },

    #[error("missing column '{0}'")]
    MissingColumn(String),

    #[error("table index {index} out of range: page has {count} tables")]
    TableNotFound { index: usize, count: usize },

    #[error("fetch failed for {url}: {reason}")]
    FetchFailed { url: String, reason: String },

    #[error("dataframe operation failed: {0}")]
    DataFrame(#[from] polars::error::PolarsError),

    #[error("config error: {0}")]
    Config(String),
}

impl ScrapeError {
    /// Build a FetchFailed from a reqwest error, keeping the URL it hit.
    pub fn fetch(url: &str, err: reqwest::Error) -> Self {
        ScrapeError::FetchFailed {
            url: url.to_string(),
            reason: err.to_string(),
        }
    }
}
