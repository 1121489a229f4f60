//! FinScrape Core — market data scraping and tabular normalization.
//!
//! This crate contains the scraping pipeline:
//! - Date-to-epoch conversion for source URL parameters
//! - Magnitude-suffix number parsing ("10B", "250K")
//! - Percentage-change series derivation
//! - Bounded page-by-page table collection with duplicate pruning
//! - DataFrame normalization (drop, rename, retype, sort)
//! - Source adapters: Yahoo price history, OpenInsider filings, Finviz screener

pub mod collect;
pub mod config;
pub mod error;
pub mod html;
pub mod magnitude;
pub mod normalize;
pub mod series;
pub mod sources;
pub mod timecode;

pub use collect::{
    collect_pages, Collected, CollectProgress, PageFetcher, StdoutProgress, StopReason, TablePage,
    DEFAULT_PAGE_BOUND,
};
pub use config::ScrapeConfig;
pub use error::ScrapeError;
pub use normalize::{normalize, NormalizeSpec};
pub use sources::client::HttpClient;
