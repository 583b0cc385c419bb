//! Command-line interface definitions.
//!
//! Flags override the YAML config file, which overrides built-in defaults.

use clap::Parser;
use speech_scrape::ScraperConfig;
use std::path::PathBuf;

/// Command-line arguments for the speech scraper.
///
/// # Examples
///
/// ```sh
/// # Scrape the default listing page into ./out/speeches.json
/// speech_scrape
///
/// # Custom config, eight workers, failures included, plus a text dump
/// speech_scrape -c scrape.yaml --concurrency 8 --show-failures --dump ./out/all.txt
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Optional path to a YAML config file
    #[arg(short, long)]
    pub config: Option<String>,

    /// Listing page to scrape
    #[arg(short, long, env = "SPEECH_LISTING_URL")]
    pub listing_url: Option<String>,

    /// Maximum number of speeches extracted at once (defaults to the CPU count)
    #[arg(long)]
    pub concurrency: Option<usize>,

    /// Output directory for the JSON export
    #[arg(short, long, default_value = "./out")]
    pub json_output_dir: String,

    /// Also write every extracted section, in listing order, to this file
    #[arg(long)]
    pub dump: Option<PathBuf>,

    /// Include failed listing entries in the JSON export
    #[arg(long)]
    pub show_failures: bool,
}

impl Cli {
    /// Layer the command-line overrides on top of `config`.
    pub fn apply(&self, config: &mut ScraperConfig) {
        if let Some(listing_url) = &self.listing_url {
            config.listing_url = listing_url.clone();
        }
        if let Some(concurrency) = self.concurrency {
            config.concurrency = concurrency;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_defaults() {
        let cli = Cli::parse_from(["speech_scrape"]);
        assert_eq!(cli.json_output_dir, "./out");
        assert!(cli.config.is_none());
        assert!(cli.dump.is_none());
        assert!(!cli.show_failures);
    }

    #[test]
    fn test_cli_overrides_config() {
        let cli = Cli::parse_from([
            "speech_scrape",
            "-l",
            "https://example.com/listing",
            "--concurrency",
            "3",
            "--dump",
            "/tmp/all.txt",
            "--show-failures",
        ]);
        let mut config = ScraperConfig::default();
        cli.apply(&mut config);
        assert_eq!(config.listing_url, "https://example.com/listing");
        assert_eq!(config.concurrency, 3);
        assert_eq!(cli.dump, Some(PathBuf::from("/tmp/all.txt")));
        assert!(cli.show_failures);
    }
}
