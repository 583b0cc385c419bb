//! Scraper configuration.
//!
//! Every field has a default pointing at the live site, so a config file is
//! optional. When one is given it is YAML, and any subset of fields may be
//! set:
//!
//! ```yaml
//! listing_url: https://www.infoplease.com/primary-sources/government/presidential-speeches/state-union-addresses
//! base_path: https://www.infoplease.com/primary-sources/government/presidential-speeches
//! speech_prefix: /state-union-address-
//! concurrency: 8
//! timeout_secs: 30
//! ```

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::num::NonZeroUsize;
use tracing::{info, instrument};
use url::Url;

/// Runtime settings for a scrape.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct ScraperConfig {
    /// The table-of-contents page listing every speech.
    pub listing_url: String,
    /// Directory URL that rebuilt speech URLs are appended to.
    pub base_path: String,
    /// Fixed path prefix of speech pages, placed between `base_path` and the slug.
    pub speech_prefix: String,
    /// Upper bound on extraction tasks running at once.
    pub concurrency: usize,
    pub user_agent: String,
    pub timeout_secs: u64,
}

impl Default for ScraperConfig {
    fn default() -> Self {
        Self {
            listing_url: "https://www.infoplease.com/primary-sources/government/presidential-speeches/state-union-addresses".to_string(),
            base_path: "https://www.infoplease.com/primary-sources/government/presidential-speeches".to_string(),
            speech_prefix: "/state-union-address-".to_string(),
            concurrency: default_concurrency(),
            user_agent: concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")).to_string(),
            timeout_secs: 30,
        }
    }
}

/// Number of available processing units, or 4 if that cannot be determined.
pub fn default_concurrency() -> usize {
    std::thread::available_parallelism()
        .map(NonZeroUsize::get)
        .unwrap_or(4)
}

impl ScraperConfig {
    /// Load a YAML config file.
    #[instrument(level = "info")]
    pub fn load(path: &str) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_string(),
            source,
        })?;
        let config = Self::from_yaml(&raw, path)?;
        info!(
            listing_url = %config.listing_url,
            concurrency = config.concurrency,
            "Loaded configuration"
        );
        Ok(config)
    }

    pub fn from_yaml(raw: &str, path: &str) -> Result<Self, ConfigError> {
        serde_yaml::from_str(raw).map_err(|source| ConfigError::Yaml {
            path: path.to_string(),
            source,
        })
    }

    /// The listing page URL, parsed.
    ///
    /// # Returns
    ///
    /// [`ConfigError::Invalid`] naming `listing_url` when it does not parse.
    pub fn listing_url(&self) -> Result<Url, ConfigError> {
        Url::parse(&self.listing_url).map_err(|e| ConfigError::Invalid {
            field: "listing_url",
            message: e.to_string(),
        })
    }

    /// Validate and extract the URL-rebuilding settings.
    pub fn site(&self) -> Result<SiteLayout, ConfigError> {
        Url::parse(&self.base_path).map_err(|e| ConfigError::Invalid {
            field: "base_path",
            message: e.to_string(),
        })?;
        if !self.speech_prefix.starts_with('/') {
            return Err(ConfigError::Invalid {
                field: "speech_prefix",
                message: format!("{:?} must start with '/'", self.speech_prefix),
            });
        }
        Ok(SiteLayout {
            base_path: self.base_path.trim_end_matches('/').to_string(),
            speech_prefix: self.speech_prefix.clone(),
        })
    }
}

/// How speech URLs are laid out on the source site.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SiteLayout {
    /// Directory URL without a trailing slash.
    pub base_path: String,
    /// Path prefix starting with `/`.
    pub speech_prefix: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = ScraperConfig::default();
        assert!(config.concurrency >= 1);
        assert!(config.listing_url().is_ok());
        let site = config.site().unwrap();
        assert!(!site.base_path.ends_with('/'));
        assert_eq!(site.speech_prefix, "/state-union-address-");
    }

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let config =
            ScraperConfig::from_yaml("concurrency: 3\ntimeout_secs: 5\n", "test.yaml").unwrap();
        assert_eq!(config.concurrency, 3);
        assert_eq!(config.timeout_secs, 5);
        assert_eq!(config.speech_prefix, ScraperConfig::default().speech_prefix);
    }

    #[test]
    fn test_bad_yaml_names_the_file() {
        let err = ScraperConfig::from_yaml("concurrency: [", "broken.yaml").unwrap_err();
        assert!(err.to_string().contains("broken.yaml"));
    }

    #[test]
    fn test_site_rejects_bad_values() {
        let config = ScraperConfig {
            base_path: "not a url".to_string(),
            ..ScraperConfig::default()
        };
        assert!(matches!(
            config.site(),
            Err(ConfigError::Invalid { field: "base_path", .. })
        ));

        let config = ScraperConfig {
            speech_prefix: "state-union-address-".to_string(),
            ..ScraperConfig::default()
        };
        assert!(matches!(
            config.site(),
            Err(ConfigError::Invalid { field: "speech_prefix", .. })
        ));
    }

    #[test]
    fn test_listing_url_rejects_relative_path() {
        let config = ScraperConfig {
            listing_url: "/state-union-addresses".to_string(),
            ..ScraperConfig::default()
        };
        assert!(matches!(
            config.listing_url(),
            Err(ConfigError::Invalid { field: "listing_url", .. })
        ));
    }

    #[test]
    fn test_load_missing_file() {
        let err = ScraperConfig::load("/definitely/not/here.yaml").unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }
}
