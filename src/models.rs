//! Data models for listing entries, extracted speeches and the run result.
//!
//! This module defines the values that flow through the pipeline:
//! - [`LinkEntry`]: one anchor taken from the listing page
//! - [`Assembled`]: the text and identifiers pulled from a resolved page
//! - [`SpeechRecord`]: a fully extracted speech
//! - [`PartialFailure`]: a listing entry whose extraction stopped early
//! - [`ResultSet`]: everything one run produced, sorted and numbered

use chrono::NaiveDate;
use itertools::Itertools;
use serde::Serialize;
use std::collections::BTreeMap;

/// One anchor from the listing page's table of contents.
///
/// The display text is expected to read `Speaker Name (Month Day, Year)`.
/// The href may be empty, relative, or simply wrong.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkEntry {
    /// Position of the anchor in the listing, starting at 0.
    pub position: usize,
    /// Raw text of the anchor.
    pub display: String,
    /// Raw `href` attribute, empty when absent.
    pub href: String,
}

impl LinkEntry {
    /// Split the display text on the first `(` into speaker name and date text.
    ///
    /// Returns `None` when the text has no `(` or no date follows it; such
    /// entries are navigation or otherwise incomplete and are skipped.
    pub fn speaker_and_date(&self) -> Option<(String, String)> {
        let (name, rest) = self.display.split_once('(')?;
        let date = rest.split(')').next().unwrap_or_default().trim();
        let name = name.trim();
        if name.is_empty() || date.is_empty() {
            return None;
        }
        Some((name.to_string(), date.to_string()))
    }
}

/// Text and identifiers extracted from one resolved speech page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Assembled {
    /// Each contributed section in table-of-contents order.
    /// A single-section page contributes exactly one.
    pub sections: Vec<String>,
    /// First alphanumeric anchor name inside the article container.
    pub article_id: Option<String>,
    /// Numeric node identifier of the article container.
    pub node_id: Option<u64>,
}

impl Assembled {
    pub fn text(&self) -> String {
        self.sections.join("\n")
    }
}

/// A fully extracted speech.
///
/// Records are immutable once built; the identifier is only assigned by
/// [`ResultSet::finalize`] after the global sort.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SpeechRecord {
    id: usize,
    speaker: String,
    date: NaiveDate,
    url: String,
    article_id: Option<String>,
    node_id: Option<u64>,
    text: String,
    #[serde(skip)]
    sections: Vec<String>,
    #[serde(skip)]
    position: usize,
}

impl SpeechRecord {
    /// Build a record from an assembled speech.
    ///
    /// # Arguments
    ///
    /// * `entry` - The listing entry the speech came from
    /// * `speaker` - Speaker name taken from the display text
    /// * `date` - Normalized speech date
    /// * `url` - The URL that resolved
    /// * `assembled` - Body sections and identifiers of the article
    ///
    /// # Returns
    ///
    /// A record with id 0; [`ResultSet::finalize`] numbers it.
    pub fn new(
        entry: &LinkEntry,
        speaker: String,
        date: NaiveDate,
        url: String,
        assembled: Assembled,
    ) -> Self {
        Self {
            id: 0,
            speaker,
            date,
            url,
            text: assembled.text(),
            article_id: assembled.article_id,
            node_id: assembled.node_id,
            sections: assembled.sections,
            position: entry.position,
        }
    }

    /// Sequential identifier, 1-based, in date order. Zero until finalized.
    pub fn id(&self) -> usize {
        self.id
    }

    pub fn speaker(&self) -> &str {
        &self.speaker
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn article_id(&self) -> Option<&str> {
        self.article_id.as_deref()
    }

    pub fn node_id(&self) -> Option<u64> {
        self.node_id
    }

    /// Full speech body; sections joined with newlines.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Position of the originating anchor on the listing page.
    pub fn position(&self) -> usize {
        self.position
    }
}

/// A listing entry whose extraction stopped before a body was produced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PartialFailure {
    pub speaker: String,
    /// `None` when the date text itself could not be parsed.
    pub date: Option<NaiveDate>,
    /// The last URL attempted before giving up, empty if none was tried.
    pub url: String,
    pub article_id: Option<String>,
    pub node_id: Option<u64>,
    pub reason: String,
}

/// Accumulated output of one run.
///
/// Tasks append through [`ResultSet::push_record`] and
/// [`ResultSet::push_failure`]; the orchestrator guards both collections
/// with one lock and calls [`ResultSet::finalize`] once every task is done.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ResultSet {
    records: Vec<SpeechRecord>,
    failures: BTreeMap<String, PartialFailure>,
}

impl ResultSet {
    /// An empty result set: no records, no failures.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an extracted speech.
    ///
    /// # Arguments
    ///
    /// * `record` - The record to keep; its id is assigned later by
    ///   [`ResultSet::finalize`]
    pub fn push_record(&mut self, record: SpeechRecord) {
        self.records.push(record);
    }

    /// Record a failure under the entry's original display text.
    pub fn push_failure(&mut self, display: impl Into<String>, failure: PartialFailure) {
        self.failures.insert(display.into(), failure);
    }

    /// Sort records by date (listing position breaks ties) and number them 1..=N.
    pub fn finalize(&mut self) {
        self.records
            .sort_by(|a, b| a.date.cmp(&b.date).then(a.position.cmp(&b.position)));
        for (i, record) in self.records.iter_mut().enumerate() {
            record.id = i + 1;
        }
    }

    pub fn records(&self) -> &[SpeechRecord] {
        &self.records
    }

    /// Failures keyed by the listing entry's original display text.
    pub fn failures(&self) -> &BTreeMap<String, PartialFailure> {
        &self.failures
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Every extracted section of every resolved page, in listing order,
    /// joined with newlines. Meant for bulk inspection, not storage.
    pub fn dump(&self) -> String {
        self.records
            .iter()
            .sorted_by_key(|r| r.position)
            .flat_map(|r| r.sections.iter())
            .join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(position: usize, display: &str) -> LinkEntry {
        LinkEntry {
            position,
            display: display.to_string(),
            href: String::new(),
        }
    }

    fn record(position: usize, date: (i32, u32, u32), sections: &[&str]) -> SpeechRecord {
        let e = entry(position, "x (y)");
        SpeechRecord::new(
            &e,
            format!("Speaker {position}"),
            NaiveDate::from_ymd_opt(date.0, date.1, date.2).unwrap(),
            format!("https://example.com/{position}"),
            Assembled {
                sections: sections.iter().map(|s| s.to_string()).collect(),
                article_id: None,
                node_id: Some(position as u64),
            },
        )
    }

    #[test]
    fn test_speaker_and_date_split() {
        let e = entry(0, "George Washington (January 8, 1790)");
        assert_eq!(
            e.speaker_and_date(),
            Some(("George Washington".to_string(), "January 8, 1790".to_string()))
        );
    }

    #[test]
    fn test_speaker_and_date_keeps_text_before_closing_paren() {
        let e = entry(0, "Harry S. Truman (January 6, 1947) - Written Message");
        assert_eq!(
            e.speaker_and_date(),
            Some(("Harry S. Truman".to_string(), "January 6, 1947".to_string()))
        );
    }

    #[test]
    fn test_speaker_and_date_without_paren_is_none() {
        assert_eq!(entry(0, "Back to top").speaker_and_date(), None);
        assert_eq!(entry(0, "Lincoln ()").speaker_and_date(), None);
    }

    #[test]
    fn test_record_text_joins_sections() {
        let r = record(0, (1790, 1, 8), &["one", "two"]);
        assert_eq!(r.text(), "one\ntwo");
        assert_eq!(r.id(), 0);
    }

    #[test]
    fn test_finalize_sorts_by_date_and_numbers() {
        let mut set = ResultSet::new();
        set.push_record(record(0, (1801, 12, 8), &["c"]));
        set.push_record(record(1, (1790, 1, 8), &["a"]));
        set.push_record(record(2, (1790, 12, 8), &["b"]));
        set.finalize();

        let ids: Vec<_> = set.records().iter().map(|r| (r.id(), r.position())).collect();
        assert_eq!(ids, vec![(1, 1), (2, 2), (3, 0)]);
    }

    #[test]
    fn test_finalize_breaks_date_ties_by_position() {
        let mut set = ResultSet::new();
        set.push_record(record(5, (1790, 1, 8), &["late"]));
        set.push_record(record(2, (1790, 1, 8), &["early"]));
        set.finalize();
        assert_eq!(set.records()[0].position(), 2);
        assert_eq!(set.records()[1].position(), 5);
    }

    #[test]
    fn test_dump_uses_listing_order() {
        let mut set = ResultSet::new();
        set.push_record(record(1, (1790, 1, 8), &["b1", "b2"]));
        set.push_record(record(0, (1801, 12, 8), &["a"]));
        set.finalize();
        assert_eq!(set.dump(), "a\nb1\nb2");
    }

    #[test]
    fn test_failures_keyed_by_display() {
        let mut set = ResultSet::new();
        set.push_failure(
            "John Adams (November 22, 1800)",
            PartialFailure {
                speaker: "John Adams".to_string(),
                date: NaiveDate::from_ymd_opt(1800, 11, 22),
                url: "https://example.com/x".to_string(),
                article_id: None,
                node_id: None,
                reason: "gone".to_string(),
            },
        );
        assert!(set.is_empty());
        assert_eq!(set.failures().len(), 1);
        assert!(set.failures().contains_key("John Adams (November 22, 1800)"));
    }

    #[test]
    fn test_record_serialization_skips_internal_fields() {
        let mut set = ResultSet::new();
        set.push_record(record(0, (1790, 1, 8), &["body"]));
        set.finalize();
        let json = serde_json::to_string(&set.records()[0]).unwrap();
        assert!(json.contains("\"date\":\"1790-01-08\""));
        assert!(json.contains("\"id\":1"));
        assert!(!json.contains("sections"));
    }
}
