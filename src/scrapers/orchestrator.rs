//! Running a full scrape.
//!
//! The listing page is fetched once and every anchor in its table of
//! contents becomes one extraction task. Tasks run concurrently up to the
//! configured limit and append their outcome to a single
//! `Mutex<ResultSet>`. Once every task has finished the records are sorted
//! by date and numbered.
//!
//! A task that fails only ever produces a [`PartialFailure`]; the batch as a
//! whole fails only when the listing page itself is unusable.

use super::assembler::SpeechAssembler;
use super::dates;
use super::fetch::PageFetcher;
use super::markup;
use super::resolver::UrlResolver;
use crate::config::{ScraperConfig, SiteLayout};
use crate::error::{ConfigError, FetchError, ResolveError, ScrapeError};
use crate::models::{LinkEntry, PartialFailure, ResultSet, SpeechRecord};
use crate::utils::truncate_for_log;
use chrono::NaiveDate;
use futures::stream::{self, StreamExt};
use tokio::sync::Mutex;
use tracing::{debug, info, instrument, warn};
use url::Url;

/// What one extraction task produced.
#[derive(Debug)]
enum Outcome {
    Record(SpeechRecord),
    Failure(PartialFailure),
    Skipped,
}

/// Drives one scrape: listing fetch, bounded fan-out, final ordering.
///
/// Owns the fetcher so every task can borrow it for the duration of the
/// run; nothing is shared between runs.
pub struct ScrapeOrchestrator<F> {
    fetcher: F,
    site: SiteLayout,
    concurrency: usize,
}

impl<F: PageFetcher> ScrapeOrchestrator<F> {
    /// Create an orchestrator.
    ///
    /// # Arguments
    ///
    /// * `fetcher` - Used for the listing page and every speech page
    /// * `site` - Base path and prefix for rebuilding broken links
    /// * `concurrency` - Maximum extraction tasks in flight, clamped to at
    ///   least one
    pub fn new(fetcher: F, site: SiteLayout, concurrency: usize) -> Self {
        Self {
            fetcher,
            site,
            concurrency: concurrency.max(1),
        }
    }

    pub fn from_config(fetcher: F, config: &ScraperConfig) -> Result<Self, ConfigError> {
        Ok(Self::new(fetcher, config.site()?, config.concurrency))
    }

    pub fn fetcher(&self) -> &F {
        &self.fetcher
    }

    /// Extract every speech listed on `listing_url`.
    ///
    /// # Arguments
    ///
    /// * `listing_url` - Absolute URL of the table-of-contents page
    ///
    /// # Returns
    ///
    /// Records sorted by date and numbered from 1, plus a failure for every
    /// speech entry that could not be extracted. Fails only when the
    /// listing page cannot be fetched or has no table of contents.
    #[instrument(level = "info", skip(self), fields(concurrency = self.concurrency))]
    pub async fn scrape_all(&self, listing_url: &str) -> Result<ResultSet, ScrapeError> {
        let listing_url = Url::parse(listing_url).map_err(|source| FetchError::InvalidUrl {
            url: listing_url.to_string(),
            source,
        })?;
        let entries = self.enumerate(&listing_url).await?;
        let total = entries.len();
        info!(links = total, "Enumerated listing links");

        let results = Mutex::new(ResultSet::new());
        stream::iter(&entries)
            .for_each_concurrent(self.concurrency, |entry| {
                let results = &results;
                let listing_url = &listing_url;
                async move {
                    let outcome = self.extract(listing_url, entry).await;
                    let mut results = results.lock().await;
                    match outcome {
                        Outcome::Record(record) => results.push_record(record),
                        Outcome::Failure(failure) => {
                            results.push_failure(entry.display.clone(), failure)
                        }
                        Outcome::Skipped => {}
                    }
                }
            })
            .await;

        let mut results = results.into_inner();
        results.finalize();
        info!(
            links = total,
            records = results.len(),
            failures = results.failures().len(),
            skipped = total - results.len() - results.failures().len(),
            "Scrape complete"
        );
        Ok(results)
    }

    /// Extract everything and return the bodies of every resolved page, in
    /// listing order, as one string.
    pub async fn dump_all(&self, listing_url: &str) -> Result<String, ScrapeError> {
        Ok(self.scrape_all(listing_url).await?.dump())
    }

    async fn enumerate(&self, listing_url: &Url) -> Result<Vec<LinkEntry>, ScrapeError> {
        let page = self.fetcher.fetch(listing_url).await?;
        markup::listing_entries(&page.document()).ok_or_else(|| ScrapeError::MissingToc {
            url: listing_url.to_string(),
        })
    }

    #[instrument(
        level = "debug",
        skip_all,
        fields(position = entry.position, display = %entry.display)
    )]
    async fn extract(&self, listing_url: &Url, entry: &LinkEntry) -> Outcome {
        let Some((speaker, date_text)) = entry.speaker_and_date() else {
            debug!("Not a speech entry; skipping");
            return Outcome::Skipped;
        };

        let date = match dates::normalize(&date_text) {
            Ok(date) => date,
            Err(e) => {
                warn!(error = %e, "Unparseable date");
                return failure(speaker, None, String::new(), e.to_string());
            }
        };

        let resolver = UrlResolver::new(&self.fetcher, listing_url, &self.site);
        let resolved = match resolver.resolve(&entry.href, &speaker, date).await {
            Ok(resolved) => resolved,
            Err(e) => {
                let ResolveError::Exhausted { last_attempted } = &e;
                warn!(%last_attempted, "No working URL for speech");
                return failure(speaker, Some(date), last_attempted.clone(), e.to_string());
            }
        };

        match SpeechAssembler::new(&self.fetcher).assemble(&resolved).await {
            Ok(assembled) => {
                debug!(
                    url = %resolved.url,
                    sections = assembled.sections.len(),
                    preview = %truncate_for_log(&assembled.text(), 80),
                    "Extracted speech"
                );
                Outcome::Record(SpeechRecord::new(
                    entry,
                    speaker,
                    date,
                    resolved.url.to_string(),
                    assembled,
                ))
            }
            Err(e) => {
                warn!(url = %resolved.url, error = %e, "Speech extraction failed");
                failure(speaker, Some(date), resolved.url.to_string(), e.to_string())
            }
        }
    }
}

fn failure(speaker: String, date: Option<NaiveDate>, url: String, reason: String) -> Outcome {
    Outcome::Failure(PartialFailure {
        speaker,
        date,
        url,
        article_id: None,
        node_id: None,
        reason,
    })
}
