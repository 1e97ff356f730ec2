//! Application configuration structures.

use std::fs;
use std::path::Path;

use scraper::Selector;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{AppError, Result};

/// Root application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// HTTP and crawling behavior settings
    #[serde(default)]
    pub crawler: CrawlerConfig,

    /// Registry endpoints and page selectors
    #[serde(default)]
    pub registry: RegistryConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .map_err(|e| AppError::config(format!("cannot read {}: {e}", path.display())))?;
        toml::from_str(&content)
            .map_err(|e| AppError::config(format!("invalid TOML in {}: {e}", path.display())))
    }

    /// Validate configuration values for basic sanity.
    pub fn validate(&self) -> Result<()> {
        if self.crawler.user_agent.trim().is_empty() {
            return Err(AppError::config("crawler.user_agent is empty"));
        }
        if self.crawler.timeout_secs == 0 {
            return Err(AppError::config("crawler.timeout_secs must be > 0"));
        }
        if self.crawler.max_concurrent == 0 {
            return Err(AppError::config("crawler.max_concurrent must be > 0"));
        }
        if self.registry.jurisdiction.trim().is_empty() {
            return Err(AppError::config("registry.jurisdiction is empty"));
        }

        self.registry
            .search_url()
            .and_then(|_| self.registry.detail_url("0"))
            .map_err(|e| AppError::config(format!("registry URL: {e}")))?;

        for selector in [
            &self.registry.result_link_selector,
            &self.registry.announcement_selector,
            &self.registry.row_selector,
        ] {
            parse_selector(selector)?;
        }
        Ok(())
    }
}

/// Parse a CSS selector, mapping failures into `AppError::Selector`.
pub fn parse_selector(s: &str) -> Result<Selector> {
    Selector::parse(s).map_err(|e| AppError::selector(s, format!("{e:?}")))
}

/// HTTP client and crawling behavior settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CrawlerConfig {
    /// User-Agent header for HTTP requests
    #[serde(default = "defaults::user_agent")]
    pub user_agent: String,

    /// Request timeout in seconds
    #[serde(default = "defaults::timeout")]
    pub timeout_secs: u64,

    /// Pause before each detail page fetch, per concurrent slot, in milliseconds
    #[serde(default = "defaults::request_delay")]
    pub request_delay_ms: u64,

    /// Maximum concurrent detail page requests
    #[serde(default = "defaults::max_concurrent")]
    pub max_concurrent: usize,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            user_agent: defaults::user_agent(),
            timeout_secs: defaults::timeout(),
            request_delay_ms: defaults::request_delay(),
            max_concurrent: defaults::max_concurrent(),
        }
    }
}

/// Registry endpoints and the selectors used on its pages.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegistryConfig {
    /// Scheme and host of the registry
    #[serde(default = "defaults::base_url")]
    pub base_url: String,

    /// Path (and query) of the search form target
    #[serde(default = "defaults::search_path")]
    pub search_path: String,

    /// Path of the announcement detail script
    #[serde(default = "defaults::detail_path")]
    pub detail_path: String,

    /// Jurisdiction code passed as `land_abk`
    #[serde(default = "defaults::jurisdiction")]
    pub jurisdiction: String,

    /// Selector for result links on the search results page
    #[serde(default = "defaults::result_link_selector")]
    pub result_link_selector: String,

    /// Selector for the element wrapping the announcement text
    #[serde(default = "defaults::announcement_selector")]
    pub announcement_selector: String,

    /// Selector for each text row inside the announcement
    #[serde(default = "defaults::row_selector")]
    pub row_selector: String,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            base_url: defaults::base_url(),
            search_path: defaults::search_path(),
            detail_path: defaults::detail_path(),
            jurisdiction: defaults::jurisdiction(),
            result_link_selector: defaults::result_link_selector(),
            announcement_selector: defaults::announcement_selector(),
            row_selector: defaults::row_selector(),
        }
    }
}

impl RegistryConfig {
    /// Full URL the search form is posted to.
    pub fn search_url(&self) -> Result<String> {
        Ok(Url::parse(&self.base_url)?
            .join(&self.search_path)?
            .to_string())
    }

    /// Full detail page URL for a registry identifier.
    pub fn detail_url(&self, rb_id: &str) -> Result<String> {
        let mut url = Url::parse(&self.base_url)?.join(&self.detail_path)?;
        url.query_pairs_mut()
            .clear()
            .append_pair("rb_id", rb_id)
            .append_pair("land_abk", &self.jurisdiction);
        Ok(url.to_string())
    }
}

mod defaults {
    // Crawler defaults
    pub fn user_agent() -> String {
        "Mozilla/5.0 (compatible; hrb-crawler/0.1)".into()
    }
    pub fn timeout() -> u64 {
        30
    }
    pub fn request_delay() -> u64 {
        0
    }
    pub fn max_concurrent() -> usize {
        5
    }

    // Registry defaults
    pub fn base_url() -> String {
        "https://www.handelsregisterbekanntmachungen.de".into()
    }
    pub fn search_path() -> String {
        "/?aktion=suche#Ergebnis".into()
    }
    pub fn detail_path() -> String {
        "/skripte/hrb.php".into()
    }
    pub fn jurisdiction() -> String {
        "bw".into()
    }
    pub fn result_link_selector() -> String {
        "li > a[href]".into()
    }
    pub fn announcement_selector() -> String {
        "font".into()
    }
    pub fn row_selector() -> String {
        "tr".into()
    }
}
