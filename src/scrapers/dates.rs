//! Date normalization for listing-entry text.
//!
//! Listing entries carry dates written by hand over several decades:
//! `January 8, 1790`, `December 3rd, 1861`, `May, 1973`. Parsing tries the
//! canonical `Month Day, Year` pattern first and then falls back on the
//! whitespace token count:
//!
//! | Tokens | Read as | Example |
//! |--------|---------|---------|
//! | 2 | `Month Year`, day 1 | `May 1973` |
//! | 3 | `Month Day Year`, non-digits stripped from the day | `January 3rd, 2009` |
//!
//! Any other count is unrecoverable.

use crate::error::DateParseError;
use chrono::{Datelike, NaiveDate};
use tracing::{debug, warn};

const CANONICAL_FORMAT: &str = "%B %d, %Y";

/// Parse loosely formatted date text into a calendar date.
pub fn normalize(text: &str) -> Result<NaiveDate, DateParseError> {
    let text = text.trim();
    if let Ok(date) = NaiveDate::parse_from_str(text, CANONICAL_FORMAT) {
        return Ok(date);
    }

    let tokens: Vec<&str> = text.split_whitespace().collect();
    let rebuilt = match tokens.as_slice() {
        [month, year] => format!("{} 1, {}", month.trim_end_matches(','), year),
        [month, day, year] => {
            let day: String = day.chars().filter(char::is_ascii_digit).collect();
            format!("{} {}, {}", month.trim_end_matches(','), day, year)
        }
        _ => {
            return Err(DateParseError {
                text: text.to_string(),
                reason: format!("expected 2 or 3 tokens, found {}", tokens.len()),
            });
        }
    };

    match NaiveDate::parse_from_str(&rebuilt, CANONICAL_FORMAT) {
        Ok(date) => {
            warn!(original = %text, %rebuilt, %date, "Date needed a fallback rule");
            Ok(date)
        }
        Err(e) => {
            debug!(original = %text, %rebuilt, error = %e, "Fallback date parse failed");
            Err(DateParseError {
                text: text.to_string(),
                reason: e.to_string(),
            })
        }
    }
}

/// Lowercase month name, day and year joined with hyphens, as in
/// `january-8-1790`. Used to rebuild speech URLs.
pub fn date_token(date: NaiveDate) -> String {
    format!(
        "{}-{}-{}",
        date.format("%B").to_string().to_lowercase(),
        date.day(),
        date.year()
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_canonical_dates() {
        assert_eq!(normalize("January 8, 1790").unwrap(), ymd(1790, 1, 8));
        assert_eq!(normalize("December 3, 1861").unwrap(), ymd(1861, 12, 3));
        assert_eq!(normalize("  February 1, 2005 ").unwrap(), ymd(2005, 2, 1));
    }

    #[test]
    fn test_month_year_defaults_to_first_day() {
        assert_eq!(normalize("May 1973").unwrap(), ymd(1973, 5, 1));
        assert_eq!(normalize("May, 1973").unwrap(), ymd(1973, 5, 1));
    }

    #[test]
    fn test_ordinal_suffix_is_stripped() {
        assert_eq!(normalize("January 3rd, 2009").unwrap(), ymd(2009, 1, 3));
        assert_eq!(
            normalize("January 3rd, 2009").unwrap(),
            normalize("January 3, 2009").unwrap()
        );
        assert_eq!(normalize("March 1st, 1973").unwrap(), ymd(1973, 3, 1));
        assert_eq!(normalize("October 22nd 1962").unwrap(), ymd(1962, 10, 22));
    }

    #[test]
    fn test_unrecoverable_token_counts() {
        let err = normalize("1790").unwrap_err();
        assert_eq!(err.text, "1790");
        assert!(err.reason.contains("found 1"));
        assert!(normalize("").is_err());
        assert!(normalize("the eighth of January, 1790").is_err());
    }

    #[test]
    fn test_bad_tokens_still_error() {
        assert!(normalize("Smarch 3rd, 2009").is_err());
        assert!(normalize("February 30th, 2009").is_err());
    }

    #[test]
    fn test_date_token() {
        assert_eq!(date_token(ymd(1790, 1, 8)), "january-8-1790");
        assert_eq!(date_token(ymd(2009, 12, 25)), "december-25-2009");
    }
}
