//! Source adapters: transport client plus one module per scraped site.

pub mod client;
pub mod finviz;
pub mod openinsider;
pub mod yahoo;

pub use client::HttpClient;
pub use finviz::{fetch_screener, screener_normalize_spec};
pub use openinsider::{fetch_insider_trades, insider_normalize_spec};
pub use yahoo::{
    fetch_price_histories, fetch_price_history, Interval, PriceBatch, PriceProvider, PriceQuery,
    TickerOutcome,
};
