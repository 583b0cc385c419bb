//! Assembling a speech body from a resolved page.
//!
//! Most speeches are a single page of paragraphs. Long ones are split into
//! parts, and their page carries a nested table of contents instead; each
//! part is then fetched in turn and the parts are joined in the order the
//! table of contents lists them. Part fetches run one after another inside
//! the owning task.

use super::fetch::PageFetcher;
use super::markup;
use super::resolver::ResolvedUrl;
use crate::error::ExtractionError;
use crate::models::Assembled;
use tracing::{debug, instrument};
use url::Url;

/// Where one part of a multi-part speech comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Part {
    /// An in-page anchor: the whole current container stands in for the part.
    SamePage,
    Remote(Url),
}

/// Builds the body of one speech, fetching its parts when it has any.
pub struct SpeechAssembler<'a, F> {
    fetcher: &'a F,
}

impl<'a, F: PageFetcher> SpeechAssembler<'a, F> {
    pub fn new(fetcher: &'a F) -> Self {
        Self { fetcher }
    }

    /// Assemble the speech body of a resolved page.
    ///
    /// # Arguments
    ///
    /// * `resolved` - A page already confirmed to hold an article container
    ///
    /// # Returns
    ///
    /// One section per table-of-contents entry in listed order, or a single
    /// section when the page is not split. Any part that cannot be fetched
    /// or has no container fails the whole speech.
    #[instrument(level = "debug", skip_all, fields(url = %resolved.url))]
    pub async fn assemble(&self, resolved: &ResolvedUrl) -> Result<Assembled, ExtractionError> {
        let article = &resolved.article;

        let sections = match &article.toc_hrefs {
            None => vec![article.paragraphs.clone()],
            Some(hrefs) => {
                debug!(parts = hrefs.len(), "Speech is split into parts");
                let parts = hrefs
                    .iter()
                    .map(|href| part_for(resolved, href))
                    .collect::<Result<Vec<_>, _>>()?;
                let mut sections = Vec::with_capacity(parts.len());
                for part in parts {
                    match part {
                        Part::SamePage => sections.push(article.paragraphs.clone()),
                        Part::Remote(url) => sections.push(self.section(url).await?),
                    }
                }
                sections
            }
        };

        Ok(Assembled {
            sections,
            article_id: article.article_id.clone(),
            node_id: Some(article.node_id),
        })
    }

    /// Fetch one part page and return its paragraphs.
    async fn section(&self, url: Url) -> Result<String, ExtractionError> {
        let page = self
            .fetcher
            .fetch(&url)
            .await
            .map_err(|source| ExtractionError::Section {
                url: url.to_string(),
                source,
            })?;
        markup::read_article(&page.document())
            .map(|article| article.paragraphs)
            .ok_or_else(|| ExtractionError::MissingArticle {
                url: url.to_string(),
            })
    }
}

fn part_for(resolved: &ResolvedUrl, href: &str) -> Result<Part, ExtractionError> {
    if href.is_empty() || href.starts_with('#') {
        return Ok(Part::SamePage);
    }
    let mut url = resolved
        .served_from
        .join(href)
        .map_err(|_| ExtractionError::SectionLink {
            url: resolved.url.to_string(),
            href: href.to_string(),
        })?;
    url.set_fragment(None);
    Ok(Part::Remote(url))
}
