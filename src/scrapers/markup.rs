//! Selectors and extraction helpers for the source site's markup.
//!
//! The site has been edited by hand for decades, so only a few structural
//! landmarks are relied on:
//!
//! - a table of contents is a `div.toc`, both on the listing page and inside
//!   multi-part speeches
//! - the article container is any element whose `id` is `node-<digits>`
//! - an article may carry an alphanumeric `<a name="...">` anchor
//! - speech text lives in `<p>` elements

use crate::models::LinkEntry;
use itertools::Itertools;
use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{ElementRef, Html, Selector};

static TOC: Lazy<Selector> = Lazy::new(|| Selector::parse("div.toc").expect("valid selector"));
static LINK: Lazy<Selector> = Lazy::new(|| Selector::parse("a").expect("valid selector"));
static NODE: Lazy<Selector> =
    Lazy::new(|| Selector::parse(r#"[id^="node-"]"#).expect("valid selector"));
static NAMED_ANCHOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("a[name]").expect("valid selector"));
static PARAGRAPH: Lazy<Selector> = Lazy::new(|| Selector::parse("p").expect("valid selector"));

static NODE_ID: Lazy<Regex> = Lazy::new(|| Regex::new(r"^node-(\d+)$").expect("valid regex"));
static ALPHANUMERIC: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z0-9]+$").expect("valid regex"));

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().join(" ")
}

/// Every anchor inside the first table of contents on the listing page,
/// in document order. `None` when the page has no table of contents.
pub fn listing_entries(document: &Html) -> Option<Vec<LinkEntry>> {
    let toc = document.select(&TOC).next()?;
    let entries = toc
        .select(&LINK)
        .enumerate()
        .map(|(position, a)| LinkEntry {
            position,
            display: collapse_whitespace(&a.text().collect::<String>()),
            href: a.value().attr("href").unwrap_or_default().trim().to_string(),
        })
        .collect();
    Some(entries)
}

/// The first element whose id is `node-<digits>`, with its numeric id.
pub fn article_container(document: &Html) -> Option<(ElementRef<'_>, u64)> {
    document.select(&NODE).find_map(|el| {
        let id = el.value().id()?;
        let node_id = NODE_ID.captures(id)?.get(1)?.as_str().parse().ok()?;
        Some((el, node_id))
    })
}

/// Owned view of an article container, detached from the parsed tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Article {
    /// Numeric part of the container's `node-<digits>` id.
    pub node_id: u64,
    /// First alphanumeric `<a name>` anchor inside the container.
    pub article_id: Option<String>,
    /// Every paragraph of the container, see [`paragraph_text`].
    pub paragraphs: String,
    /// Hrefs of a nested table of contents, see [`nested_toc_hrefs`].
    pub toc_hrefs: Option<Vec<String>>,
}

/// Read the article container of a document into owned values.
///
/// # Returns
///
/// `None` when the document holds no recognizable speech article.
pub fn read_article(document: &Html) -> Option<Article> {
    let (container, node_id) = article_container(document)?;
    Some(Article {
        node_id,
        article_id: article_anchor(container),
        paragraphs: paragraph_text(container),
        toc_hrefs: nested_toc_hrefs(container),
    })
}

/// First alphanumeric `<a name>` anchor inside the container.
pub fn article_anchor(container: ElementRef<'_>) -> Option<String> {
    container
        .select(&NAMED_ANCHOR)
        .filter_map(|a| a.value().attr("name"))
        .find(|name| ALPHANUMERIC.is_match(name))
        .map(str::to_string)
}

/// Every paragraph in the container, trimmed, joined with newlines.
pub fn paragraph_text(container: ElementRef<'_>) -> String {
    container
        .select(&PARAGRAPH)
        .map(|p| p.text().collect::<String>().trim().to_string())
        .join("\n")
}

/// Hrefs of a table of contents nested inside the container, in document
/// order. `None` when the container has no nested table of contents.
pub fn nested_toc_hrefs(container: ElementRef<'_>) -> Option<Vec<String>> {
    let toc = container.select(&TOC).next()?;
    Some(
        toc.select(&LINK)
            .map(|a| a.value().attr("href").unwrap_or_default().trim().to_string())
            .collect(),
    )
}
