//! Service layer for the crawler application.
//!
//! This module contains the business logic for:
//! - Field extraction from announcement text (`extractors`)
//! - Record assembly (`parse_registration`)
//! - Detail page handling (`DetailPageHandler`)
//! - Search result handling (`SearchResultHandler`)
//! - Crawl orchestration (`RegistrationCrawler`)

pub mod detail;
pub mod extractors;
pub mod page;
pub mod parser;
pub mod registrations;
pub mod search;

pub use detail::DetailPageHandler;
pub use page::{PageHandler, PageOutput, PageRequest};
pub use parser::parse_registration;
pub use registrations::RegistrationCrawler;
pub use search::SearchResultHandler;
