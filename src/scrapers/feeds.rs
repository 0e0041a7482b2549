//! RSS/Atom feed fetching.
//!
//! Each source is read once, parsed with `feed-rs`, and its first
//! `max_per_source` entries become [`Article`]s. Sources are processed one
//! after another in the order given.
//!
//! # Source Identifiers
//!
//! - `http://` / `https://` URLs are downloaded with the shared client.
//! - `file://` URLs and plain paths are read from disk.
//!
//! # Publication Dates
//!
//! `feed-rs` turns dates into timestamps and drops the ones it cannot parse.
//! [`Article::published`] keeps the feed's own text instead, so the raw
//! `pubDate`/`published`/`dc:date` values are read with `quick-xml` (or
//! `date_published` for JSON Feed) and matched to entries by position.

use super::FeedFetcher;
use crate::models::Article;
use feed_rs::model::{Entry, Link};
use futures::stream::{self, StreamExt};
use quick_xml::Reader;
use quick_xml::events::Event;
use reqwest::Client;
use std::error::Error;
use std::path::PathBuf;
use tracing::{debug, error, info, instrument, warn};
use url::Url;

/// Feed fetcher backed by `reqwest` for remote sources.
#[derive(Debug, Clone)]
pub struct HttpFeedFetcher {
    client: Client,
}

impl HttpFeedFetcher {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Read and parse a single source.
    #[instrument(level = "info", skip(self))]
    async fn fetch_source(
        &self,
        source: &str,
        max_per_source: usize,
    ) -> Result<Vec<Article>, Box<dyn Error>> {
        let bytes = self.read_source(source).await?;
        let feed = feed_rs::parser::parse(&bytes[..])?;
        let mut published = raw_published_dates(&bytes).into_iter();
        if published.len() != feed.entries.len() {
            warn!(
                entries = feed.entries.len(),
                dates = published.len(),
                "Raw publication dates do not line up with entries"
            );
            published = Vec::new().into_iter();
        }
        let articles = feed
            .entries
            .into_iter()
            .take(max_per_source)
            .map(|entry| entry_to_article(entry, source, published.next().unwrap_or_default()))
            .collect::<Vec<_>>();
        debug!(count = articles.len(), "Parsed feed entries");
        Ok(articles)
    }

    async fn read_source(&self, source: &str) -> Result<Vec<u8>, Box<dyn Error>> {
        match Url::parse(source) {
            Ok(url) if matches!(url.scheme(), "http" | "https") => {
                let response = self.client.get(url).send().await?.error_for_status()?;
                Ok(response.bytes().await?.to_vec())
            }
            Ok(url) if url.scheme() == "file" => {
                let path = url
                    .to_file_path()
                    .map_err(|_| format!("not a local file URL: {source}"))?;
                Ok(tokio::fs::read(path).await?)
            }
            _ => Ok(tokio::fs::read(PathBuf::from(source)).await?),
        }
    }
}

impl FeedFetcher for HttpFeedFetcher {
    #[instrument(level = "info", skip_all, fields(sources = sources.len(), max_per_source = max_per_source))]
    async fn fetch(&self, sources: &[String], max_per_source: usize) -> Vec<Article> {
        let per_source: Vec<Vec<Article>> = stream::iter(sources)
            .then(move |source| async move {
                info!(%source, "Fetching feed");
                match self.fetch_source(source, max_per_source).await {
                    Ok(articles) => {
                        info!(%source, count = articles.len(), "Fetched feed");
                        articles
                    }
                    Err(e) => {
                        error!(%source, error = %e, "Feed fetch failed; skipping source");
                        Vec::new()
                    }
                }
            })
            .collect()
            .await;

        let articles = per_source.into_iter().flatten().collect::<Vec<_>>();
        info!(count = articles.len(), "Fetched articles from all sources");
        articles
    }
}

/// Map one parsed feed entry onto an [`Article`], defaulting absent fields
/// to empty strings. `published` is the entry's date text as the feed wrote it.
fn entry_to_article(entry: Entry, source: &str, published: String) -> Article {
    Article {
        title: entry.title.map(|t| t.content).unwrap_or_default(),
        link: entry_link(entry.links),
        description: entry.summary.map(|s| s.content).unwrap_or_default(),
        published,
        source: source.to_string(),
        content: String::new(),
        relevance_score: None,
    }
}

/// The entry's `alternate` link (a link without `rel` counts as one), else its first link.
fn entry_link(links: Vec<Link>) -> String {
    let alternate = links
        .iter()
        .position(|l| matches!(l.rel.as_deref(), None | Some("alternate")))
        .unwrap_or(0);
    links
        .into_iter()
        .nth(alternate)
        .map(|l| l.href)
        .unwrap_or_default()
}

/// Elements (by local name) holding an entry's publication date.
const DATE_ELEMENTS: [&[u8]; 4] = [b"pubDate", b"published", b"date", b"issued"];

/// One trimmed date string per feed entry, in document order, `""` where an
/// entry has none. The first date element inside an entry wins.
fn raw_published_dates(bytes: &[u8]) -> Vec<String> {
    if bytes.trim_ascii_start().starts_with(b"{") {
        return json_published_dates(bytes);
    }

    let mut reader = Reader::from_reader(bytes);
    reader.config_mut().trim_text(true);

    let mut dates: Vec<Option<String>> = Vec::new();
    let mut in_entry = false;
    let mut capture: Option<String> = None;

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => match e.local_name().as_ref() {
                b"item" | b"entry" => {
                    in_entry = true;
                    dates.push(None);
                }
                name if in_entry
                    && DATE_ELEMENTS.iter().any(|date| *date == name)
                    && dates.last().is_some_and(Option::is_none) =>
                {
                    capture = Some(String::new());
                }
                _ => {}
            },
            Ok(Event::Text(t)) => {
                if let Some(text) = capture.as_mut() {
                    text.push_str(&String::from_utf8_lossy(&t));
                }
            }
            Ok(Event::CData(t)) => {
                if let Some(text) = capture.as_mut() {
                    text.push_str(&String::from_utf8_lossy(&t));
                }
            }
            Ok(Event::End(e)) => match e.local_name().as_ref() {
                b"item" | b"entry" => in_entry = false,
                _ => {
                    if let (Some(text), Some(slot)) = (capture.take(), dates.last_mut()) {
                        *slot = Some(text.trim().to_string());
                    }
                }
            },
            Ok(Event::Eof) => break,
            Err(e) => {
                debug!(error = %e, "Stopped reading raw publication dates");
                break;
            }
            _ => {}
        }
    }

    dates.into_iter().map(Option::unwrap_or_default).collect()
}

/// `date_published` of each JSON Feed item, as written.
fn json_published_dates(bytes: &[u8]) -> Vec<String> {
    let Ok(feed) = serde_json::from_slice::<serde_json::Value>(bytes) else {
        return Vec::new();
    };
    feed["items"]
        .as_array()
        .map(|items| {
            items
                .iter()
                .map(|item| item["date_published"].as_str().unwrap_or_default().to_string())
                .collect()
        })
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scrapers::test_server;

    const THREE_ITEM_RSS: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<rss version="2.0">
  <channel>
    <title>Test Feed</title>
    <link>https://example.com</link>
    <description>Fixture</description>
    <item>
      <title>First LLM story</title>
      <link>https://example.com/first</link>
      <description>About generative AI</description>
      <pubDate>Wed, 05 Mar 2025 10:00:00 GMT</pubDate>
    </item>
    <item>
      <title>Second story</title>
      <link>https://example.com/second</link>
      <pubDate>5th March 2025</pubDate>
    </item>
    <item>
      <description>No title or link here</description>
    </item>
  </channel>
</rss>"#;

    fn fetcher() -> HttpFeedFetcher {
        HttpFeedFetcher::new(Client::new())
    }

    async fn write_fixture(dir: &tempfile::TempDir) -> String {
        let path = dir.path().join("feed.xml");
        tokio::fs::write(&path, THREE_ITEM_RSS).await.unwrap();
        path.to_string_lossy().into_owned()
    }

    #[tokio::test]
    async fn test_fetch_local_feed_maps_fields() {
        let dir = tempfile::tempdir().unwrap();
        let source = write_fixture(&dir).await;

        let articles = fetcher().fetch(&[source.clone()], 20).await;
        assert_eq!(articles.len(), 3);

        let first = &articles[0];
        assert_eq!(first.title, "First LLM story");
        assert_eq!(first.link, "https://example.com/first");
        assert_eq!(first.description, "About generative AI");
        assert_eq!(first.published, "Wed, 05 Mar 2025 10:00:00 GMT");
        assert_eq!(first.source, source);
        assert_eq!(first.content, "");
        assert_eq!(first.relevance_score, None);

        let second = &articles[1];
        assert_eq!(second.title, "Second story");
        assert_eq!(second.description, "");
        assert_eq!(second.published, "5th March 2025");

        let third = &articles[2];
        assert_eq!(third.title, "");
        assert_eq!(third.link, "");
        assert_eq!(third.published, "");
    }

    #[tokio::test]
    async fn test_fetch_caps_entries_per_source() {
        let dir = tempfile::tempdir().unwrap();
        let source = write_fixture(&dir).await;

        let articles = fetcher().fetch(&[source], 2).await;
        assert_eq!(articles.len(), 2);
        assert_eq!(articles[0].title, "First LLM story");
        assert_eq!(articles[1].title, "Second story");
    }

    #[tokio::test]
    async fn test_failed_source_is_isolated() {
        let dir = tempfile::tempdir().unwrap();
        let good = write_fixture(&dir).await;
        let bad = test_server::refused_url().await;

        let articles = fetcher().fetch(&[bad, good], 20).await;
        assert_eq!(articles.len(), 3);
    }

    #[tokio::test]
    async fn test_http_feed_and_error_status() {
        let ok = test_server::serve("200 OK", "application/rss+xml", THREE_ITEM_RSS.to_string()).await;
        let missing = test_server::serve("404 Not Found", "text/plain", "gone".to_string()).await;
        let malformed = test_server::serve("200 OK", "text/html", "<html>not a feed</html>".to_string()).await;

        let sources = vec![
            format!("{missing}/rss"),
            format!("{ok}/rss"),
            format!("{malformed}/rss"),
        ];
        let articles = fetcher().fetch(&sources, 20).await;
        assert_eq!(articles.len(), 3);
        assert!(articles.iter().all(|a| a.source == sources[1]));
    }

    #[tokio::test]
    async fn test_file_url_source() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_fixture(&dir).await;
        let url = Url::from_file_path(&path).unwrap().to_string();

        let articles = fetcher().fetch(&[url], 1).await;
        assert_eq!(articles.len(), 1);
    }

    #[tokio::test]
    async fn test_sources_keep_input_order() {
        let dir = tempfile::tempdir().unwrap();
        let source = write_fixture(&dir).await;
        let other = dir.path().join("other.xml");
        tokio::fs::write(
            &other,
            r#"<?xml version="1.0"?><rss version="2.0"><channel><title>Other</title>
<item><title>Other story</title><link>https://other.example/1</link></item>
</channel></rss>"#,
        )
        .await
        .unwrap();
        let other = other.to_string_lossy().into_owned();

        let articles = fetcher().fetch(&[other, source], 20).await;
        assert_eq!(articles.len(), 4);
        assert_eq!(articles[0].title, "Other story");
        assert_eq!(articles[1].title, "First LLM story");
    }

    #[tokio::test]
    async fn test_atom_entry_prefers_alternate_link_and_keeps_date_text() {
        let atom = r#"<?xml version="1.0" encoding="utf-8"?>
<feed xmlns="http://www.w3.org/2005/Atom">
  <title>Atom Fixture</title>
  <id>urn:fixture</id>
  <updated>2025-03-05T12:00:00Z</updated>
  <entry>
    <title>Agents everywhere</title>
    <id>urn:fixture:1</id>
    <link rel="replies" href="https://example.com/post/comments"/>
    <link rel="alternate" href="https://example.com/post"/>
    <updated>2025-03-05T12:00:00Z</updated>
    <published>2025-03-05T10:00:00Z</published>
    <summary>Agentic AI</summary>
  </entry>
  <entry>
    <title>Podcast</title>
    <id>urn:fixture:2</id>
    <link rel="enclosure" href="https://example.com/episode.mp3"/>
    <updated>2025-03-04T12:00:00Z</updated>
  </entry>
</feed>"#;
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("atom.xml");
        tokio::fs::write(&path, atom).await.unwrap();

        let articles = fetcher()
            .fetch(&[path.to_string_lossy().into_owned()], 20)
            .await;
        assert_eq!(articles.len(), 2);
        assert_eq!(articles[0].link, "https://example.com/post");
        assert_eq!(articles[0].published, "2025-03-05T10:00:00Z");
        assert_eq!(articles[0].description, "Agentic AI");
        assert_eq!(articles[1].link, "https://example.com/episode.mp3");
        assert_eq!(articles[1].published, "");
    }

    #[test]
    fn test_raw_dates_from_dublin_core_and_cdata() {
        let rss = br#"<rss version="2.0" xmlns:dc="http://purl.org/dc/elements/1.1/"><channel>
<item><title>a</title><dc:date>2025-03-05</dc:date></item>
<item><title>b</title><pubDate><![CDATA[ Tue, 04 Mar 2025 ]]></pubDate><dc:date>ignored</dc:date></item>
<item><title>c</title></item>
</channel></rss>"#;
        assert_eq!(
            raw_published_dates(rss),
            vec!["2025-03-05", "Tue, 04 Mar 2025", ""]
        );
    }

    #[test]
    fn test_raw_dates_from_json_feed() {
        let json = br#"{"version": "https://jsonfeed.org/version/1.1", "title": "J",
"items": [{"id": "1", "date_published": "2025-03-05T10:00:00-05:00"}, {"id": "2"}]}"#;
        assert_eq!(
            raw_published_dates(json),
            vec!["2025-03-05T10:00:00-05:00", ""]
        );
    }
}
