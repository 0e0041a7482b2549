//! Network-facing collectors for feeds and article pages.
//!
//! The pipeline talks to the outside world through two narrow traits:
//!
//! | Trait | HTTP implementation | Job |
//! |-------|---------------------|-----|
//! | [`FeedFetcher`] | [`feeds::HttpFeedFetcher`] | Turn feed sources into [`Article`]s |
//! | [`ContentExtractor`] | [`content::HttpContentExtractor`] | Turn an article URL into body text |
//!
//! # Failure Model
//!
//! Both collectors absorb their own errors. A source that cannot be fetched
//! contributes no articles; a page that cannot be scraped yields empty text.
//! Failures are logged and never abort the run. Nothing is retried.

use crate::config::NewsletterConfig;
use crate::models::Article;
use reqwest::Client;
use std::error::Error;
use std::time::Duration;

pub mod content;
pub mod feeds;

/// Reads feed sources into article records.
pub trait FeedFetcher {
    /// Fetch up to `max_per_source` entries from each source, in source order.
    ///
    /// Sources that fail are logged and skipped.
    async fn fetch(&self, sources: &[String], max_per_source: usize) -> Vec<Article>;
}

/// Pulls readable body text out of an article page.
pub trait ContentExtractor {
    /// Extract bounded plain text from `url`, or `""` on any failure.
    async fn extract(&self, url: &str) -> String;
}

/// Build the HTTP client shared by both collectors.
///
/// Every request carries the configured browser-like `User-Agent` and is
/// bounded by the configured timeout.
pub fn build_client(config: &NewsletterConfig) -> Result<Client, Box<dyn Error>> {
    let client = Client::builder()
        .user_agent(config.user_agent.as_str())
        .timeout(Duration::from_secs(config.request_timeout_secs))
        .build()?;
    Ok(client)
}
