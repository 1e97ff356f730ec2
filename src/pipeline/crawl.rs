// src/pipeline/crawl.rs

//! Registration crawling pipeline.

use std::io;
use std::path::PathBuf;
use std::sync::Arc;

use chrono::Utc;

use crate::error::{AppError, Result};
use crate::models::{Config, CrawlStats, DateRange};
use crate::output::{OutputFormat, write_registrations};
use crate::services::RegistrationCrawler;
use crate::storage::LocalStorage;
use crate::utils::http::Fetcher;
use crate::utils::log as console;

/// Validated inputs for one crawl run.
#[derive(Debug, Clone)]
pub struct CrawlRequest {
    pub range: DateRange,
    pub format: OutputFormat,
    /// Export file; records go to stdout when unset
    pub output: Option<PathBuf>,
}

/// Run the registration crawler and export the results.
pub async fn run_crawler<F: Fetcher>(
    config: Arc<Config>,
    fetcher: F,
    request: &CrawlRequest,
) -> Result<CrawlStats> {
    config.validate()?;

    let start_time = Utc::now();
    console::header("Registration crawler starting");

    if request.range.is_inverted() {
        log::warn!(
            "Start date {} is after end date {}; the registry may return no results",
            request.range.start,
            request.range.end
        );
    }

    let crawler = RegistrationCrawler::new(Arc::clone(&config), fetcher)?;
    let outcome = crawler.collect(&request.range).await?;

    match &request.output {
        Some(path) => {
            let key = path
                .file_name()
                .and_then(|name| name.to_str())
                .ok_or_else(|| {
                    AppError::validation(format!("invalid output path {}", path.display()))
                })?;
            let storage = LocalStorage::for_file(path);
            let meta = storage
                .write_registrations(key, request.format, &outcome.registrations)
                .await?;
            console::sub_item(&format!("Export: {}", meta.location.display()));
        }
        None => {
            let stdout = io::stdout();
            write_registrations(stdout.lock(), request.format, &outcome.registrations)?;
        }
    }

    let stats = CrawlStats::new(start_time, Utc::now(), &outcome);
    console::summary(
        "Crawl complete",
        &[
            ("Registrations", stats.registration_count.to_string()),
            ("Detail pages", stats.detail_total.to_string()),
            ("Failed", stats.detail_failures.to_string()),
            ("Skipped", outcome.detail_skipped.to_string()),
            ("Success rate", format!("{:.1}%", stats.success_rate() * 100.0)),
            ("Elapsed", format!("{:.1}s", stats.elapsed_secs())),
        ],
    );

    Ok(stats)
}
