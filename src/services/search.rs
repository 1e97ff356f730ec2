// src/services/search.rs

//! Search results handler.
//!
//! Finds registry identifiers in result links and turns each one into a
//! detail page fetch.

use std::sync::LazyLock;

use regex::Regex;
use scraper::{Html, Selector};

use crate::error::Result;
use crate::models::{RegistryConfig, parse_selector};
use crate::services::page::{PageHandler, PageOutput, PageRequest};

static RB_ID_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"rb_id=([^&'"]+)&"#).expect("rb_id pattern is valid"));

/// Extract the `rb_id` value from a result link target.
pub fn extract_rb_id(href: &str) -> Option<&str> {
    RB_ID_RE
        .captures(href)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

/// Discovers detail pages on the search results page.
pub struct SearchResultHandler {
    link_sel: Selector,
    registry: RegistryConfig,
}

impl SearchResultHandler {
    pub fn new(config: &RegistryConfig) -> Result<Self> {
        Ok(Self {
            link_sel: parse_selector(&config.result_link_selector)?,
            registry: config.clone(),
        })
    }

    /// Detail page URLs in the order their links appear.
    pub fn detail_urls(&self, document: &Html) -> Vec<String> {
        document
            .select(&self.link_sel)
            .filter_map(|link| link.value().attr("href"))
            .filter_map(extract_rb_id)
            .filter_map(|rb_id| match self.registry.detail_url(rb_id) {
                Ok(url) => Some(url),
                Err(e) => {
                    log::warn!("Cannot build detail URL for rb_id {rb_id}: {e}");
                    None
                }
            })
            .collect()
    }
}

impl PageHandler for SearchResultHandler {
    fn handle(&self, document: &Html) -> PageOutput {
        let urls = self.detail_urls(document);
        log::info!("Discovered {} announcement link(s)", urls.len());
        PageOutput::follow(urls.into_iter().map(PageRequest::Get).collect())
    }
}
