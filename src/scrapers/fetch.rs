//! Page fetching.
//!
//! A [`PageFetcher`] performs exactly one GET per call and hands back the raw
//! markup as a [`Page`]. There are no retries here: falling back to another
//! URL is the resolver's job. Parsing into a [`scraper::Html`] tree happens
//! on demand through [`Page::document`], so callers can drop the tree before
//! their next `.await`.

use crate::config::ScraperConfig;
use crate::error::FetchError;
use reqwest::Client;
use scraper::Html;
use std::future::Future;
use std::time::Duration;
use tracing::{debug, instrument};
use url::Url;

/// Raw markup of one fetched page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page {
    /// URL the body was served from.
    pub url: Url,
    pub html: String,
}

impl Page {
    /// Parse the body into a traversable document.
    pub fn document(&self) -> Html {
        Html::parse_document(&self.html)
    }
}

/// Anything that can GET a page.
///
/// Implementations hold no mutable state and are shared by every
/// concurrent extraction task.
pub trait PageFetcher: Send + Sync {
    fn fetch(&self, url: &Url) -> impl Future<Output = Result<Page, FetchError>> + Send;
}

/// [`PageFetcher`] backed by a shared `reqwest` client.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    /// Build a fetcher around a fresh `reqwest` client.
    ///
    /// # Arguments
    ///
    /// * `user_agent` - Sent with every request
    /// * `timeout` - Whole-request timeout, connect through body
    ///
    /// # Returns
    ///
    /// The client builder's error when TLS or the user agent is rejected.
    pub fn new(user_agent: &str, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .user_agent(user_agent)
            .timeout(timeout)
            .build()?;
        Ok(Self { client })
    }

    pub fn from_config(config: &ScraperConfig) -> Result<Self, reqwest::Error> {
        Self::new(&config.user_agent, Duration::from_secs(config.timeout_secs))
    }
}

impl PageFetcher for HttpFetcher {
    #[instrument(level = "debug", skip_all, fields(%url))]
    async fn fetch(&self, url: &Url) -> Result<Page, FetchError> {
        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|source| FetchError::Request {
                url: url.to_string(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let served_from = response.url().clone();
        let html = response.text().await.map_err(|source| FetchError::Request {
            url: url.to_string(),
            source,
        })?;
        if html.trim().is_empty() {
            return Err(FetchError::Body {
                url: url.to_string(),
            });
        }

        debug!(bytes = html.len(), %served_from, "Fetched page");
        Ok(Page {
            url: served_from,
            html,
        })
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    //! In-memory fetcher for unit tests.

    use super::*;
    use std::collections::HashMap;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Serves canned pages and records every URL requested, in call order.
    #[derive(Debug, Default)]
    pub struct StaticFetcher {
        pages: HashMap<String, String>,
        delays: HashMap<String, Duration>,
        calls: Mutex<Vec<String>>,
        in_flight: AtomicUsize,
        max_in_flight: AtomicUsize,
    }

    impl StaticFetcher {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn page(mut self, url: &str, html: &str) -> Self {
            self.pages.insert(url.to_string(), html.to_string());
            self
        }

        /// Answer `url` only after `delay`, to shuffle completion order.
        pub fn delay(mut self, url: &str, delay: Duration) -> Self {
            self.delays.insert(url.to_string(), delay);
            self
        }

        pub fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }

        pub fn calls_to(&self, url: &str) -> usize {
            self.calls().iter().filter(|c| c.as_str() == url).count()
        }

        /// Highest number of fetches that were ever running at once.
        pub fn max_in_flight(&self) -> usize {
            self.max_in_flight.load(Ordering::SeqCst)
        }
    }

    impl PageFetcher for StaticFetcher {
        async fn fetch(&self, url: &Url) -> Result<Page, FetchError> {
            let key = url.to_string();
            self.calls.lock().unwrap().push(key.clone());
            let running = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            self.max_in_flight.fetch_max(running, Ordering::SeqCst);
            if let Some(delay) = self.delays.get(&key) {
                tokio::time::sleep(*delay).await;
            }
            self.in_flight.fetch_sub(1, Ordering::SeqCst);
            match self.pages.get(&key) {
                Some(html) => Ok(Page {
                    url: url.clone(),
                    html: html.clone(),
                }),
                None => Err(FetchError::Status {
                    url: key,
                    status: 404,
                }),
            }
        }
    }
}
