//! Scrape configuration.
//!
//! Stored as a TOML file; every field has a default so an empty config (or
//! none at all) works for interactive use.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::collect::DEFAULT_PAGE_BOUND;
use crate::error::ScrapeError;

const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 \
     (KHTML, like Gecko) Chrome/50.0.2661.75 Safari/537.36";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScrapeConfig {
    /// User-agent header sent with every request. Some sources reject the
    /// default reqwest agent.
    pub user_agent: String,
    /// Transport timeout in seconds.
    pub timeout_secs: u64,
    /// Upper bound on pages fetched per logical source.
    pub page_bound: usize,
}

impl Default for ScrapeConfig {
    fn default() -> Self {
        Self {
            user_agent: DEFAULT_USER_AGENT.to_string(),
            timeout_secs: 30,
            page_bound: DEFAULT_PAGE_BOUND,
        }
    }
}

impl ScrapeConfig {
    /// Load a config from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, ScrapeError> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| ScrapeError::Config(format!("read config file: {e}")))?;
        Self::from_toml(&content)
    }

    /// Parse a config from a TOML string.
    pub fn from_toml(content: &str) -> Result<Self, ScrapeError> {
        toml::from_str(content).map_err(|e| ScrapeError::Config(format!("parse config TOML: {e}")))
    }

    /// Serialize the config to TOML.
    pub fn to_toml(&self) -> Result<String, ScrapeError> {
        toml::to_string_pretty(self)
            .map_err(|e| ScrapeError::Config(format!("serialize config: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_sane() {
        let cfg = ScrapeConfig::default();
        assert_eq!(cfg.timeout_secs, 30);
        assert_eq!(cfg.page_bound, DEFAULT_PAGE_BOUND);
        assert!(cfg.user_agent.contains("Mozilla"));
    }

    #[test]
    fn partial_toml_fills_defaults() {
        let cfg = ScrapeConfig::from_toml("page_bound = 10\n").unwrap();
        assert_eq!(cfg.page_bound, 10);
        assert_eq!(cfg.timeout_secs, 30);
    }

    #[test]
    fn toml_roundtrip() {
        let cfg = ScrapeConfig::default();
        let parsed = ScrapeConfig::from_toml(&cfg.to_toml().unwrap()).unwrap();
        assert_eq!(cfg.page_bound, parsed.page_bound);
        assert_eq!(cfg.user_agent, parsed.user_agent);
    }
}
