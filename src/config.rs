//! Curation settings.
//!
//! [`NewsletterConfig`] is an explicit value handed to the pipeline; there is
//! no process-wide configuration. The built-in defaults describe the stock
//! AI & Tech newsletter. A YAML file can override any subset of fields.
//!
//! ```yaml
//! title: "Weekly Robotics Digest"
//! max_selected: 10
//! ai_keywords: ["robotics", "autonomy"]
//! ```

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::path::Path;
use tracing::{info, instrument};

/// Browser-like agent string sent with every feed and page request.
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36";

/// All knobs of a curation run.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct NewsletterConfig {
    /// Feed URLs (or local feed files) to read, in order.
    pub sources: Vec<String>,
    /// Maximum number of entries taken from each source.
    pub max_articles: usize,
    /// Age window in days. Declared for compatibility; selection ignores it.
    pub lookback_days: u32,
    /// AI-specific keywords, matched before the tech list.
    pub ai_keywords: Vec<String>,
    /// General technology keywords.
    pub tech_keywords: Vec<String>,
    /// How many scored articles make it into the newsletter.
    pub max_selected: usize,
    /// How many of the selected articles get their page text scraped.
    pub enrich_count: usize,
    /// How many selected articles are shown to the analysis model.
    pub analysis_sample: usize,
    /// Heading of the rendered newsletter.
    pub title: String,
    /// `User-Agent` header for outgoing requests.
    pub user_agent: String,
    /// Per-request timeout in seconds.
    pub request_timeout_secs: u64,
    /// Upper bound, in characters, on scraped article text.
    pub content_max_chars: usize,
}

impl Default for NewsletterConfig {
    fn default() -> Self {
        Self {
            sources: to_strings(&[
                "https://feeds.feedburner.com/oreilly/radar",
                "https://news.ycombinator.com/rss",
                "https://techcrunch.com/feed/",
                "https://www.theverge.com/rss/index.xml",
                "https://venturebeat.com/feed/",
                "https://www.wired.com/feed/rss",
            ]),
            max_articles: 20,
            lookback_days: 7,
            ai_keywords: to_strings(&[
                "artificial intelligence",
                "machine learning",
                "AI",
                "ML",
                "LLM",
                "large language model",
                "generative AI",
                "deep learning",
                "neural network",
                "transformer",
                "GPT",
                "Claude",
                "ChatGPT",
                "automation",
                "robotics",
            ]),
            tech_keywords: to_strings(&[
                "technology",
                "software",
                "programming",
                "startup",
                "tech company",
                "cloud computing",
                "cybersecurity",
                "blockchain",
                "cryptocurrency",
                "web development",
                "mobile app",
                "API",
                "database",
                "DevOps",
            ]),
            max_selected: 15,
            enrich_count: 5,
            analysis_sample: 10,
            title: "AI & Tech Weekly".to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            request_timeout_secs: 10,
            content_max_chars: 3000,
        }
    }
}

impl NewsletterConfig {
    /// Load a configuration from a YAML file.
    ///
    /// Fields missing from the file keep their [`Default`] values.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not valid YAML for
    /// this structure.
    #[instrument(level = "info", skip_all, fields(path = %path.as_ref().display()))]
    pub async fn load(path: impl AsRef<Path>) -> Result<Self, Box<dyn Error>> {
        let raw = tokio::fs::read_to_string(path.as_ref()).await?;
        let config = Self::from_yaml(&raw)?;
        info!(
            sources = config.sources.len(),
            keywords = config.keywords().len(),
            "Loaded newsletter configuration"
        );
        Ok(config)
    }

    /// Parse a configuration from YAML text.
    pub fn from_yaml(raw: &str) -> Result<Self, Box<dyn Error>> {
        Ok(serde_yaml::from_str(raw)?)
    }

    /// The combined keyword list used for relevance: AI keywords first, then
    /// tech keywords.
    pub fn keywords(&self) -> Vec<String> {
        self.ai_keywords
            .iter()
            .chain(self.tech_keywords.iter())
            .cloned()
            .collect()
    }

    /// Reject configurations that cannot produce a newsletter.
    pub fn validate(&self) -> Result<(), Box<dyn Error>> {
        if self.sources.is_empty() {
            return Err("no feed sources configured".into());
        }
        if self.ai_keywords.is_empty() && self.tech_keywords.is_empty() {
            return Err("no relevance keywords configured".into());
        }
        Ok(())
    }
}

fn to_strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}
