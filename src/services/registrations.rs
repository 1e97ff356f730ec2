// src/services/registrations.rs

//! Registration crawler service.
//!
//! Submits a date-ranged search, follows every discovered announcement link
//! and collects one `Registration` per detail page.

use std::sync::Arc;
use std::time::Duration;

use futures::stream::{self, StreamExt};
use scraper::Html;

use crate::error::{AppError, Result};
use crate::models::{Config, CrawlOutcome, DateRange, SearchForm};
use crate::services::detail::DetailPageHandler;
use crate::services::page::{PageHandler, PageOutput, PageRequest};
use crate::services::search::SearchResultHandler;
use crate::utils::http::Fetcher;

/// Service for crawling registrations from the registry.
pub struct RegistrationCrawler<F> {
    config: Arc<Config>,
    fetcher: F,
    search: SearchResultHandler,
    detail: DetailPageHandler,
}

impl<F: Fetcher> RegistrationCrawler<F> {
    /// Create a crawler with handlers built from the registry configuration.
    pub fn new(config: Arc<Config>, fetcher: F) -> Result<Self> {
        let search = SearchResultHandler::new(&config.registry)?;
        let detail = DetailPageHandler::new(&config.registry)?;
        Ok(Self {
            config,
            fetcher,
            search,
            detail,
        })
    }

    /// Search request for a date range.
    pub fn search_request(&self, range: &DateRange) -> Result<PageRequest> {
        Ok(PageRequest::PostForm {
            url: self.config.registry.search_url()?,
            form: SearchForm::new(range).params().to_vec(),
        })
    }

    /// Run the search for `range` and collect registrations in discovery order.
    ///
    /// A failed search submission is returned as an error. Failed detail
    /// pages are counted and skipped.
    pub async fn collect(&self, range: &DateRange) -> Result<CrawlOutcome> {
        let request = self.search_request(range)?;
        log::info!(
            "Searching announcements from {} to {}",
            range.start,
            range.end
        );

        let results = self
            .visit(&request, &self.search)
            .await
            .map_err(|e| AppError::crawl("search", e))?;

        let follow_ups = results.follow_ups;
        let mut outcome = CrawlOutcome {
            detail_total: follow_ups.len(),
            ..CrawlOutcome::default()
        };

        let delay = Duration::from_millis(self.config.crawler.request_delay_ms);
        let concurrency = self.config.crawler.max_concurrent.max(1);

        // `buffered` yields in input order, so records keep discovery order.
        // The delay runs inside each slot, ahead of its fetch.
        let mut detail_stream = stream::iter(follow_ups)
            .map(|request| async move {
                if !delay.is_zero() {
                    tokio::time::sleep(delay).await;
                }
                let result = self.visit(&request, &self.detail).await;
                (request, result)
            })
            .buffered(concurrency);

        while let Some((request, result)) = detail_stream.next().await {
            match result {
                Ok(PageOutput {
                    record: Some(record),
                    ..
                }) => outcome.registrations.push(record),
                Ok(_) => {
                    outcome.detail_skipped += 1;
                    log::debug!("No announcement found at {}", request.url());
                }
                Err(error) => {
                    outcome.detail_failures += 1;
                    log::warn!("Failed to fetch detail page {}: {}", request.url(), error);
                }
            }
        }

        Ok(outcome)
    }

    /// Fetch one page and run a handler over it.
    async fn visit<H: PageHandler>(&self, request: &PageRequest, handler: &H) -> Result<PageOutput> {
        let body = self.fetcher.fetch(request).await?;
        let document = Html::parse_document(&body);
        Ok(handler.handle(&document))
    }
}
