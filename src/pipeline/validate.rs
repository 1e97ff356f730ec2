// src/pipeline/validate.rs

use crate::error::Result;
use crate::models::Config;
use crate::utils::log as console;

/// Validate configuration and print the values a crawl will use.
pub fn run_validate(config: &Config) -> Result<()> {
    console::header("Validating configuration");

    if let Err(e) = config.validate() {
        log::error!("Config validation failed: {e}");
        return Err(e);
    }

    log::info!("✓ Config OK");
    console::sub_item(&format!("User agent: {}", config.crawler.user_agent));
    console::sub_item(&format!("Timeout: {}s", config.crawler.timeout_secs));
    console::sub_item(&format!(
        "Max concurrent: {}",
        config.crawler.max_concurrent
    ));
    console::sub_item(&format!("Search URL: {}", config.registry.search_url()?));
    console::sub_item(&format!(
        "Jurisdiction: {}",
        config.registry.jurisdiction
    ));
    Ok(())
}
