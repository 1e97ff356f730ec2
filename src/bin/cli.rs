//! hrb-crawler CLI
//!
//! Fetches company registrations announced in the commercial register.

use std::path::PathBuf;
use std::sync::Arc;

use chrono::Local;
use clap::{Parser, Subcommand};
use hrb_crawler::{
    error::Result,
    models::{Config, DateRange},
    output::OutputFormat,
    pipeline::{self, CrawlRequest},
    utils::http::HttpFetcher,
};

/// Commercial register announcement crawler
#[derive(Parser, Debug)]
#[command(
    name = "hrb-crawler",
    version,
    about = "Fetches company registrations from commercial register announcements"
)]
struct Cli {
    /// Path to the configuration file
    #[arg(short, long, default_value = "hrb-crawler.toml", global = true)]
    config: PathBuf,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Search announcements in a date range and export registrations
    Crawl {
        /// Output format (csv or jsonl)
        #[arg(long, default_value = "csv")]
        format: String,

        /// First announcement day, YYYY-MM-DD (default: today)
        #[arg(long)]
        start_date: Option<String>,

        /// Last announcement day, YYYY-MM-DD (default: today)
        #[arg(long)]
        end_date: Option<String>,

        /// Write records to this file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Validate configuration file
    Validate,
}

/// Initialize logging based on verbosity flag.
fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp_secs()
        .init();
}

/// Main entry point for the CLI application.
#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = if cli.config.exists() {
        let config = Config::load(&cli.config)?;
        log::info!("Loaded configuration from {}", cli.config.display());
        config
    } else {
        log::debug!(
            "No configuration at {}, using defaults",
            cli.config.display()
        );
        Config::default()
    };

    match cli.command {
        Command::Crawl {
            format,
            start_date,
            end_date,
            output,
        } => {
            // Reject bad input before any network activity.
            let format: OutputFormat = format.parse()?;
            let today = Local::now().date_naive();
            let range = DateRange::parse(start_date.as_deref(), end_date.as_deref(), today)?;
            config.validate()?;

            let fetcher = HttpFetcher::from_config(&config.crawler)?;
            let request = CrawlRequest {
                range,
                format,
                output,
            };
            pipeline::run_crawler(Arc::new(config), fetcher, &request).await?;
        }

        Command::Validate => pipeline::run_validate(&config)?,
    }

    Ok(())
}
