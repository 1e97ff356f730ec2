// src/models/mod.rs

//! Domain models for the crawler application.
//!
//! This module contains all data structures used throughout the application,
//! organized by their primary purpose.

mod config;
mod registration;
mod search;

use chrono::{DateTime, Utc};

// Re-export all public types
pub use config::{Config, CrawlerConfig, RegistryConfig, parse_selector};
pub use registration::{DATE_DISPLAY_FORMAT, Registration};
pub use search::{DATE_INPUT_FORMAT, DateRange, SearchForm};

/// Summary of a crawl run.
#[derive(Debug, Default)]
pub struct CrawlOutcome {
    /// Extracted registrations in link-discovery order
    pub registrations: Vec<Registration>,
    /// Detail pages discovered on the results page
    pub detail_total: usize,
    /// Detail pages that could not be fetched
    pub detail_failures: usize,
    /// Detail pages fetched but without an announcement block
    pub detail_skipped: usize,
}

/// Timing and counters for a finished crawl.
#[derive(Debug, Clone)]
pub struct CrawlStats {
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub registration_count: usize,
    pub detail_total: usize,
    pub detail_failures: usize,
}

impl CrawlStats {
    pub fn new(start_time: DateTime<Utc>, end_time: DateTime<Utc>, outcome: &CrawlOutcome) -> Self {
        Self {
            start_time,
            end_time,
            registration_count: outcome.registrations.len(),
            detail_total: outcome.detail_total,
            detail_failures: outcome.detail_failures,
        }
    }

    /// Fraction of discovered detail pages that were fetched successfully.
    pub fn success_rate(&self) -> f64 {
        if self.detail_total == 0 {
            return 1.0;
        }
        (self.detail_total - self.detail_failures) as f64 / self.detail_total as f64
    }

    pub fn elapsed_secs(&self) -> f64 {
        (self.end_time - self.start_time).num_milliseconds() as f64 / 1000.0
    }
}
