// src/services/detail.rs

//! Detail page handler.
//!
//! Turns the rows of an announcement block into text lines and parses them
//! into a `Registration`.

use scraper::{Html, Selector};

use crate::error::Result;
use crate::models::{RegistryConfig, parse_selector};
use crate::services::page::{PageHandler, PageOutput};
use crate::services::parser::parse_registration;

/// Extracts one registration from an announcement detail page.
pub struct DetailPageHandler {
    container_sel: Selector,
    row_sel: Selector,
}

impl DetailPageHandler {
    pub fn new(config: &RegistryConfig) -> Result<Self> {
        Ok(Self {
            container_sel: parse_selector(&config.announcement_selector)?,
            row_sel: parse_selector(&config.row_selector)?,
        })
    }

    /// Text of each row of the first announcement container that has rows.
    pub fn announcement_lines(&self, document: &Html) -> Vec<String> {
        document
            .select(&self.container_sel)
            .map(|container| {
                container
                    .select(&self.row_sel)
                    .map(|row| row.text().collect::<String>())
                    .collect::<Vec<_>>()
            })
            .find(|lines| !lines.is_empty())
            .unwrap_or_default()
    }
}

impl PageHandler for DetailPageHandler {
    fn handle(&self, document: &Html) -> PageOutput {
        let lines = self.announcement_lines(document);
        if lines.is_empty() {
            log::debug!("No announcement rows on detail page, skipping");
            return PageOutput::default();
        }

        PageOutput::record(Some(parse_registration(&lines)))
    }
}
