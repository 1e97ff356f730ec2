//! Pipeline entry points for crawler operations.
//!
//! - `run_crawler`: Search, crawl detail pages, export registrations
//! - `run_validate`: Check configuration before a crawl

pub mod crawl;
pub mod validate;

pub use crawl::{CrawlRequest, run_crawler};
pub use validate::run_validate;
