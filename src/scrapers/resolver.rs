//! Turning unreliable listing links into working speech URLs.
//!
//! Listing hrefs are frequently stale, relative, or missing altogether, but
//! the display text reliably names the speaker and date. Candidates are
//! tried in a fixed order and the first one that serves a page with an
//! article container wins:
//!
//! 1. the literal href, fragment stripped
//! 2. `{base_path}{speech_prefix}{slug}-{date}`, only when the href is empty
//!    or lacks the slug or the date token
//! 3. `{base_path}/{slug}-{date}`
//!
//! An href that already contains both the slug and the date token is trusted
//! and never triggers the prefixed rebuild.

use super::dates::date_token;
use super::fetch::PageFetcher;
use super::markup::{self, Article};
use crate::config::SiteLayout;
use crate::error::ResolveError;
use crate::utils::slugify_name;
use chrono::NaiveDate;
use tracing::{debug, instrument, warn};
use url::Url;

/// A URL confirmed to serve a speech article.
///
/// The fetch that confirmed it already read the article container, so the
/// page is never parsed a second time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedUrl {
    /// The candidate URL that validated.
    pub url: Url,
    /// URL the page was actually served from; relative links on the page
    /// are joined against it.
    pub served_from: Url,
    pub article: Article,
}

/// Tries candidate URLs for one listing page until one serves a speech.
///
/// Borrows the shared fetcher and site layout, so a resolver is cheap to
/// build inside every extraction task.
pub struct UrlResolver<'a, F> {
    fetcher: &'a F,
    /// Page the hrefs were found on; relative hrefs are joined against it.
    origin: &'a Url,
    site: &'a SiteLayout,
}

impl<'a, F: PageFetcher> UrlResolver<'a, F> {
    /// Create a resolver for links found on `origin`.
    ///
    /// # Arguments
    ///
    /// * `fetcher` - Fetcher used for every candidate
    /// * `origin` - The listing page URL, base for relative hrefs
    /// * `site` - Base path and speech prefix used to rebuild URLs
    pub fn new(fetcher: &'a F, origin: &'a Url, site: &'a SiteLayout) -> Self {
        Self {
            fetcher,
            origin,
            site,
        }
    }

    /// Find a working URL for one speech.
    ///
    /// # Arguments
    ///
    /// * `href` - The listing link as written, possibly empty
    /// * `speaker` - Speaker name from the display text
    /// * `date` - Normalized speech date
    ///
    /// # Returns
    ///
    /// The first candidate whose page holds an article container, or
    /// [`ResolveError::Exhausted`] naming the last URL attempted.
    #[instrument(level = "debug", skip(self))]
    pub async fn resolve(
        &self,
        href: &str,
        speaker: &str,
        date: NaiveDate,
    ) -> Result<ResolvedUrl, ResolveError> {
        let mut last_attempted = String::new();

        if !href.is_empty() {
            let stripped = href.split('#').next().unwrap_or_default();
            match self.origin.join(stripped) {
                Ok(url) => {
                    last_attempted = url.to_string();
                    if let Some(resolved) = self.try_candidate(url).await {
                        return Ok(resolved);
                    }
                }
                Err(e) => warn!(%href, error = %e, "Listing href is not a usable URL"),
            }
        }

        let slug = slugify_name(speaker);
        let token = date_token(date);
        let untrusted = href.is_empty() || !href.contains(&slug) || !href.contains(&token);

        let mut candidates = Vec::with_capacity(2);
        if untrusted {
            candidates.push(format!(
                "{}{}{}-{}",
                self.site.base_path, self.site.speech_prefix, slug, token
            ));
        }
        candidates.push(format!("{}/{}-{}", self.site.base_path, slug, token));

        for candidate in candidates {
            let url = match Url::parse(&candidate) {
                Ok(url) => url,
                Err(e) => {
                    warn!(%candidate, error = %e, "Rebuilt URL does not parse");
                    continue;
                }
            };
            last_attempted = url.to_string();
            if let Some(resolved) = self.try_candidate(url).await {
                return Ok(resolved);
            }
        }

        Err(ResolveError::Exhausted { last_attempted })
    }

    /// Fetch `url` and keep it only if it holds an article container.
    async fn try_candidate(&self, url: Url) -> Option<ResolvedUrl> {
        let page = match self.fetcher.fetch(&url).await {
            Ok(page) => page,
            Err(e) => {
                debug!(%url, error = %e, "Candidate fetch failed");
                return None;
            }
        };
        let Some(article) = markup::read_article(&page.document()) else {
            debug!(%url, "Candidate page has no article container");
            return None;
        };
        debug!(%url, node_id = article.node_id, "Candidate accepted");
        Some(ResolvedUrl {
            url,
            served_from: page.url,
            article,
        })
    }
}
