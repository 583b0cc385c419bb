//! # Speech Scrape
//!
//! Command-line front end: loads configuration, runs one scrape of the
//! listing page and writes the results.
//!
//! ## Usage
//!
//! ```sh
//! speech_scrape -j ./out --show-failures
//! ```
//!
//! ## Pipeline
//!
//! 1. **Listing**: fetch the table-of-contents page once
//! 2. **Extraction**: one task per link, bounded by `--concurrency`
//! 3. **Finalize**: sort by date, number from 1
//! 4. **Output**: JSON export, optional text dump

use clap::Parser;
use speech_scrape::outputs::{json, text};
use speech_scrape::utils::ensure_writable_dir;
use speech_scrape::{HttpFetcher, ScrapeOrchestrator, ScraperConfig};
use std::error::Error;
use tracing::{debug, error, info, warn};
use tracing_subscriber::{EnvFilter, fmt as tfmt};

mod cli;

use cli::Cli;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    // --- Tracing init ---
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();

    let start_time = std::time::Instant::now();
    info!("speech_scrape starting up");

    let args = Cli::parse();
    debug!(?args, "Parsed CLI arguments");

    let mut config = match &args.config {
        Some(path) => ScraperConfig::load(path)?,
        None => ScraperConfig::default(),
    };
    args.apply(&mut config);
    let listing_url = config.listing_url()?;
    info!(
        listing_url = %config.listing_url,
        concurrency = config.concurrency,
        "Configuration ready"
    );

    // Fail before scraping rather than after
    if let Err(e) = ensure_writable_dir(&args.json_output_dir).await {
        error!(
            path = %args.json_output_dir,
            error = %e,
            "JSON output directory is not writable (fix perms or choose a different path)"
        );
        return Err(e);
    }

    let fetcher = HttpFetcher::from_config(&config)?;
    let orchestrator = ScrapeOrchestrator::from_config(fetcher, &config)?;
    let results = orchestrator.scrape_all(listing_url.as_str()).await?;

    for (display_name, failure) in results.failures() {
        warn!(display = %display_name, url = %failure.url, reason = %failure.reason, "Speech not extracted");
    }

    json::write_result_set(&results, &args.json_output_dir, args.show_failures).await?;

    if let Some(path) = &args.dump {
        text::write_dump(&results, path).await?;
    }

    let elapsed = start_time.elapsed();
    info!(
        ?elapsed,
        records = results.len(),
        failures = results.failures().len(),
        "Execution complete"
    );

    Ok(())
}
