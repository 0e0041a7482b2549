//! Data models for curated articles.
//!
//! A single entity flows through the whole pipeline:
//! - [`Article`]: one feed entry, created by the fetcher, scored by the
//!   selector, enriched with page text, then consumed by the renderer.
//!
//! Articles live for exactly one curation run. Nothing is persisted between
//! runs.

use serde::{Deserialize, Serialize};

/// A feed entry as it moves through the curation pipeline.
///
/// Every text field defaults to an empty string when the feed leaves it out,
/// so downstream stages never deal with missing values.
///
/// # Fields
///
/// * `title` - Entry headline (may be empty)
/// * `link` - Article URL; never rewritten after the fetcher creates it
/// * `description` - Short summary from the feed (may be empty)
/// * `published` - Publication timestamp from the feed (may be empty)
/// * `source` - Identifier of the feed the entry came from
/// * `content` - Scraped body text, filled only for enriched articles
/// * `relevance_score` - Keyword match count, `None` until scored
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct Article {
    /// The entry headline.
    pub title: String,
    /// The canonical article URL.
    pub link: String,
    /// The summary text published in the feed.
    pub description: String,
    /// The publication timestamp as reported by the feed.
    pub published: String,
    /// The feed URL or path this entry was read from.
    pub source: String,
    /// Extracted body text, empty unless the article was enriched.
    pub content: String,
    /// Number of distinct keywords matched, set by the selector.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub relevance_score: Option<u32>,
}

impl Article {
    /// Network location of the article link, used as the display domain.
    ///
    /// This is the link text between `//` and the first `/`, `?` or `#`,
    /// taken as written: case, port and any userinfo are kept. Links without
    /// a `scheme://` or `//` prefix yield an empty string.
    ///
    /// For example: `"https://techcrunch.com/2025/03/05/story"` -> `"techcrunch.com"`
    pub fn domain(&self) -> &str {
        let rest = match self.link.split_once("://") {
            Some((scheme, rest)) if is_scheme(scheme) => rest,
            _ => match self.link.strip_prefix("//") {
                Some(rest) => rest,
                None => return "",
            },
        };
        let end = rest.find(['/', '?', '#']).unwrap_or(rest.len());
        &rest[..end]
    }

    /// The text the relevance selector searches: title and description
    /// joined by a single space, lowercased.
    pub fn search_text(&self) -> String {
        format!("{} {}", self.title, self.description).to_lowercase()
    }
}

/// A URL scheme: an ASCII letter followed by letters, digits, `+`, `-` or `.`.
fn is_scheme(candidate: &str) -> bool {
    let mut chars = candidate.chars();
    chars.next().is_some_and(|c| c.is_ascii_alphabetic())
        && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
}
