//! Best-effort article body extraction.
//!
//! Pages are fetched once and reduced to plain text with a fixed list of
//! content-region selectors, tried in order:
//!
//! 1. `article`
//! 2. `[role="main"]`
//! 3. `.article-content`
//! 4. `.post-content`
//! 5. `.entry-content`
//! 6. `.content`
//!
//! The first selector that matches anything wins and its first match supplies
//! the text. When nothing matches, or the match holds no text, the whole
//! document is used instead. `script` and `style` elements never contribute.

use super::ContentExtractor;
use once_cell::sync::Lazy;
use regex::Regex;
use reqwest::Client;
use scraper::{ElementRef, Html, Selector};
use std::error::Error;
use tracing::{debug, error, info, instrument};

static CONTENT_SELECTORS: Lazy<Vec<Selector>> = Lazy::new(|| {
    [
        "article",
        r#"[role="main"]"#,
        ".article-content",
        ".post-content",
        ".entry-content",
        ".content",
    ]
    .iter()
    .map(|css| Selector::parse(css).expect("content selector is valid CSS"))
    .collect()
});

static NON_CONTENT: Lazy<Selector> =
    Lazy::new(|| Selector::parse("script, style").expect("script/style selector is valid CSS"));

static BLANK_LINES: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\n\s*\n").expect("blank line pattern is valid"));

/// Article scraper backed by `reqwest`.
#[derive(Debug, Clone)]
pub struct HttpContentExtractor {
    client: Client,
    max_chars: usize,
}

impl HttpContentExtractor {
    /// Create an extractor that keeps at most `max_chars` characters per page.
    pub fn new(client: Client, max_chars: usize) -> Self {
        Self { client, max_chars }
    }

    async fn download(&self, url: &str) -> Result<String, Box<dyn Error>> {
        let response = self.client.get(url).send().await?.error_for_status()?;
        Ok(response.text().await?)
    }
}

impl ContentExtractor for HttpContentExtractor {
    #[instrument(level = "info", skip(self))]
    async fn extract(&self, url: &str) -> String {
        match self.download(url).await {
            Ok(html) => {
                let text = extract_text(&html, self.max_chars);
                info!(chars = text.chars().count(), "Extracted article text");
                text
            }
            Err(e) => {
                error!(%url, error = %e, "Article scrape failed");
                String::new()
            }
        }
    }
}

/// Reduce an HTML page to bounded plain text.
///
/// Text nodes are trimmed, empty ones dropped, and the rest joined with
/// newlines. Any run of blank lines collapses to a single blank line, then the
/// result is cut to `max_chars` characters.
pub fn extract_text(html: &str, max_chars: usize) -> String {
    let mut document = Html::parse_document(html);
    strip_non_content(&mut document);

    let region = CONTENT_SELECTORS
        .iter()
        .find_map(|selector| document.select(selector).next());

    let mut text = region.map(element_text).unwrap_or_default();
    if text.is_empty() {
        debug!("No content region text; falling back to whole document");
        text = element_text(document.root_element());
    }

    let text = BLANK_LINES.replace_all(&text, "\n\n");
    text.chars().take(max_chars).collect()
}

fn strip_non_content(document: &mut Html) {
    let ids = document
        .select(&NON_CONTENT)
        .map(|el| el.id())
        .collect::<Vec<_>>();
    for id in ids {
        if let Some(mut node) = document.tree.get_mut(id) {
            node.detach();
        }
    }
}

fn element_text(element: ElementRef<'_>) -> String {
    element
        .text()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scrapers::test_server;

    #[test]
    fn test_article_tag_wins_over_content_class() {
        let html = r#"<html><body>
            <div class="content">Sidebar blurb</div>
            <article><h1>Headline</h1><p>Body paragraph.</p></article>
        </body></html>"#;
        assert_eq!(extract_text(html, 3000), "Headline\nBody paragraph.");
    }

    #[test]
    fn test_role_main_before_class_selectors() {
        let html = r#"<html><body>
            <div class="post-content">Post text</div>
            <div role="main"><p>Main region</p></div>
        </body></html>"#;
        assert_eq!(extract_text(html, 3000), "Main region");
    }

    #[test]
    fn test_class_selectors_in_priority_order() {
        let html = r#"<html><body>
            <div class="content">Generic</div>
            <div class="entry-content">Entry</div>
            <div class="post-content">Post</div>
        </body></html>"#;
        assert_eq!(extract_text(html, 3000), "Post");
    }

    #[test]
    fn test_first_matching_element_only() {
        let html = r#"<html><body>
            <article>One</article>
            <article>Two</article>
        </body></html>"#;
        assert_eq!(extract_text(html, 3000), "One");
    }

    #[test]
    fn test_script_and_style_are_removed() {
        let html = r#"<html><head><style>body { color: red; }</style></head><body>
            <article><script>var tracking = 1;</script><p>Visible</p></article>
        </body></html>"#;
        let text = extract_text(html, 3000);
        assert_eq!(text, "Visible");
    }

    #[test]
    fn test_fallback_to_whole_document() {
        let html = r#"<html><head><title>Page title</title></head>
            <body><div><p>Loose text</p><span>more</span></div></body></html>"#;
        assert_eq!(extract_text(html, 3000), "Page title\nLoose text\nmore");
    }

    #[test]
    fn test_empty_region_falls_back_to_document() {
        let html = r#"<html><body><article>   </article><p>Outside</p></body></html>"#;
        assert_eq!(extract_text(html, 3000), "Outside");
    }

    #[test]
    fn test_blank_line_runs_collapse() {
        let html = "<html><body><article><pre>first\n\n\n   \nsecond</pre></article></body></html>";
        assert_eq!(extract_text(html, 3000), "first\n\nsecond");
    }

    #[test]
    fn test_truncates_by_characters() {
        let body = "é".repeat(5000);
        let html = format!("<html><body><article>{body}</article></body></html>");
        let text = extract_text(&html, 3000);
        assert_eq!(text.chars().count(), 3000);
    }

    #[tokio::test]
    async fn test_http_404_yields_empty_text() {
        let base = test_server::serve("404 Not Found", "text/html", "<html><body><article>Nope</article></body></html>".to_string()).await;
        let extractor = HttpContentExtractor::new(Client::new(), 3000);
        assert_eq!(extractor.extract(&format!("{base}/missing")).await, "");
    }

    #[tokio::test]
    async fn test_network_error_yields_empty_text() {
        let url = test_server::refused_url().await;
        let extractor = HttpContentExtractor::new(Client::new(), 3000);
        assert_eq!(extractor.extract(&url).await, "");
    }

    #[tokio::test]
    async fn test_http_success_extracts_article() {
        let base = test_server::serve(
            "200 OK",
            "text/html; charset=utf-8",
            "<html><body><nav>Menu</nav><article><p>Story text</p></article></body></html>".to_string(),
        )
        .await;
        let extractor = HttpContentExtractor::new(Client::new(), 3000);
        assert_eq!(extractor.extract(&format!("{base}/story")).await, "Story text");
    }
}
