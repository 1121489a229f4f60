//! Blocking HTTP transport.
//!
//! One client, built once and reused across every fetch. Sources treat it as
//! "a function that returns page content given a URL" — no retries, no
//! backoff, no per-source state.

use crate::config::ScrapeConfig;
use crate::error::ScrapeError;
use reqwest::header::{HeaderMap, HeaderValue, USER_AGENT};
use std::time::Duration;

pub struct HttpClient {
    inner: reqwest::blocking::Client,
}

impl HttpClient {
    pub fn new(config: &ScrapeConfig) -> Self {
        let mut headers = HeaderMap::new();
        headers.insert(
            USER_AGENT,
            HeaderValue::from_str(&config.user_agent)
                .unwrap_or(HeaderValue::from_static("finscrape/0.1")),
        );
        // Finviz serves the full table only to XHR-looking requests.
        headers.insert(
            "X-Requested-With",
            HeaderValue::from_static("XMLHttpRequest"),
        );

        let inner = reqwest::blocking::Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .expect("failed to build HTTP client");

        Self { inner }
    }

    /// GET a URL and return the response body as text. Non-2xx statuses are
    /// fetch failures.
    pub fn get_text(&self, url: &str) -> Result<String, ScrapeError> {
        self.inner
            .get(url)
            .send()
            .and_then(|resp| resp.error_for_status())
            .and_then(|resp| resp.text())
            .map_err(|e| ScrapeError::fetch(url, e))
    }
}

impl Default for HttpClient {
    fn default() -> Self {
        Self::new(&ScrapeConfig::default())
    }
}
