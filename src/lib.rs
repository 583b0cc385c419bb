//! # Speech Scrape
//!
//! Extracts a structured record for every State of the Union address listed
//! on a single table-of-contents page. Links on that page have been written
//! by hand for decades, so the pipeline tolerates stale or missing hrefs,
//! irregular date text and speeches split over several pages.
//!
//! ```ignore
//! let config = ScraperConfig::default();
//! let fetcher = HttpFetcher::from_config(&config)?;
//! let orchestrator = ScrapeOrchestrator::from_config(fetcher, &config)?;
//! let results = orchestrator.scrape_all(&config.listing_url).await?;
//! for record in results.records() {
//!     println!("{} {} {}", record.id(), record.date(), record.speaker());
//! }
//! ```

pub mod config;
pub mod error;
pub mod models;
pub mod outputs;
pub mod scrapers;
pub mod utils;

pub use config::ScraperConfig;
pub use models::{PartialFailure, ResultSet, SpeechRecord};
pub use scrapers::fetch::{HttpFetcher, PageFetcher};
pub use scrapers::orchestrator::ScrapeOrchestrator;
