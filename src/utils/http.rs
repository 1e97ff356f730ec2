// src/utils/http.rs

//! HTTP client utilities.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;

use crate::error::Result;
use crate::models::CrawlerConfig;
use crate::services::page::PageRequest;

/// Create a configured asynchronous HTTP client.
pub fn create_async_client(config: &CrawlerConfig) -> Result<Client> {
    let client = Client::builder()
        .user_agent(&config.user_agent)
        .timeout(Duration::from_secs(config.timeout_secs))
        .build()?;
    Ok(client)
}

/// Source of page bodies for the crawler.
#[async_trait]
pub trait Fetcher: Send + Sync {
    /// Perform a request and return the response body as text.
    async fn fetch(&self, request: &PageRequest) -> Result<String>;
}

/// `Fetcher` backed by a reqwest client.
#[derive(Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    pub fn from_config(config: &CrawlerConfig) -> Result<Self> {
        Ok(Self::new(create_async_client(config)?))
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch(&self, request: &PageRequest) -> Result<String> {
        let builder = match request {
            PageRequest::Get(url) => self.client.get(url),
            PageRequest::PostForm { url, form } => self.client.post(url).form(form),
        };

        log::debug!("Fetching {}", request.url());
        let text = builder.send().await?.error_for_status()?.text().await?;
        Ok(text)
    }
}
