//! Error taxonomy for the extraction pipeline.
//!
//! Each stage of the pipeline owns one error type. Apart from
//! [`ScrapeError`], none of them ever escape a per-link task: the
//! orchestrator turns them into a [`PartialFailure`](crate::models::PartialFailure)
//! or a silent skip.

use thiserror::Error;

/// A single page fetch failed (the transport error family).
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("invalid URL {url}: {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error("request to {url} failed: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("{url} answered with HTTP {status}")]
    Status { url: String, status: u16 },

    #[error("{url} returned an empty or unreadable body")]
    Body { url: String },
}

/// Date text could not be normalized by any fallback rule.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unrecognised date {text:?}: {reason}")]
pub struct DateParseError {
    pub text: String,
    pub reason: String,
}

/// No candidate URL validated as a speech page.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ResolveError {
    #[error("no candidate URL held a speech article (last tried {last_attempted})")]
    Exhausted { last_attempted: String },
}

/// A resolved page could not be turned into speech text.
#[derive(Error, Debug)]
pub enum ExtractionError {
    #[error("no article container on {url}")]
    MissingArticle { url: String },

    #[error("section {url} could not be fetched: {source}")]
    Section {
        url: String,
        #[source]
        source: FetchError,
    },

    #[error("section link {href:?} on {url} is not a valid URL")]
    SectionLink { url: String, href: String },
}

/// The whole run failed; nothing could be fanned out.
#[derive(Error, Debug)]
pub enum ScrapeError {
    #[error("listing page could not be fetched: {0}")]
    Listing(#[from] FetchError),

    #[error("listing page {url} has no table of contents")]
    MissingToc { url: String },
}

/// Configuration could not be loaded.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("could not read config file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("could not parse config file {path}: {source}")]
    Yaml {
        path: String,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("invalid {field}: {message}")]
    Invalid { field: &'static str, message: String },
}
