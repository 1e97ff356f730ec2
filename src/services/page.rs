// src/services/page.rs

//! Page handler capability shared by the search and detail handlers.

use scraper::Html;

use crate::models::Registration;

/// A fetch the crawler should perform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageRequest {
    /// Plain GET of a page
    Get(String),
    /// Form-encoded POST
    PostForm {
        url: String,
        form: Vec<(&'static str, String)>,
    },
}

impl PageRequest {
    pub fn url(&self) -> &str {
        match self {
            PageRequest::Get(url) => url,
            PageRequest::PostForm { url, .. } => url,
        }
    }
}

/// What a handler produced for one page.
#[derive(Debug, Default)]
pub struct PageOutput {
    /// Follow-up fetches, in discovery order
    pub follow_ups: Vec<PageRequest>,
    /// Record extracted from the page, if any
    pub record: Option<Registration>,
}

impl PageOutput {
    pub fn follow(follow_ups: Vec<PageRequest>) -> Self {
        Self {
            follow_ups,
            record: None,
        }
    }

    pub fn record(record: Option<Registration>) -> Self {
        Self {
            follow_ups: Vec::new(),
            record,
        }
    }
}

/// Handles one parsed page.
pub trait PageHandler {
    fn handle(&self, document: &Html) -> PageOutput;
}
