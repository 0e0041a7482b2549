//! Curation pipeline: fetch, select, enrich, analyze, render, persist.
//!
//! [`Curator`] owns the configuration and the two network collectors and runs
//! the stages strictly in sequence:
//!
//! 1. **Fetch** every configured feed ([`FeedFetcher`])
//! 2. **Select** the most relevant articles ([`scoring::select`])
//! 3. **Enrich** the leading few with page text ([`enrich`])
//! 4. **Analyze** (optional) with a language model; advisory only
//! 5. **Render** the markdown newsletter
//! 6. **Persist** it to the requested path
//!
//! # Outcomes
//!
//! A run that gets as far as rendering always returns `Ok` with a
//! [`CurationOutcome`] saying what happened. Only configuration problems,
//! detected before any network traffic, are returned as `Err`.

use crate::api::{AskAsync, analyze_articles};
use crate::config::NewsletterConfig;
use crate::models::Article;
use crate::outputs::{json, markdown};
use crate::scoring;
use crate::scrapers::{ContentExtractor, FeedFetcher};
use crate::utils::{ensure_parent_dir, truncate_for_log};
use std::error::Error;
use std::path::{Path, PathBuf};
use tracing::{error, info, instrument, warn};

/// Result of a curation run that reached the render stage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CurationOutcome {
    /// The newsletter was written with at least one story.
    Published {
        path: PathBuf,
        stories: usize,
        /// Advisory model commentary, when analysis ran and succeeded.
        analysis: Option<String>,
    },
    /// Nothing matched the keywords; an empty newsletter was still written.
    NoRelevantArticles { path: PathBuf, fetched: usize },
    /// The newsletter was rendered but could not be written.
    WriteFailed { path: PathBuf, error: String },
}

/// Articles that survived selection, plus how many were fetched in total.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    pub fetched: usize,
    pub articles: Vec<Article>,
}

/// Overwrite `content` on each article with text scraped from its link.
///
/// Articles are processed one at a time. A failed scrape leaves empty content.
#[instrument(level = "info", skip_all, fields(count = articles.len()))]
pub async fn enrich<E: ContentExtractor>(articles: &mut [Article], extractor: &E) {
    for article in articles.iter_mut() {
        article.content = extractor.extract(&article.link).await;
    }
    let enriched = articles.iter().filter(|a| !a.content.is_empty()).count();
    info!(enriched, "Enriched top articles with page text");
}

/// Runs the curation pipeline with an explicit configuration.
#[derive(Debug)]
pub struct Curator<F, E> {
    config: NewsletterConfig,
    fetcher: F,
    extractor: E,
    json_output: Option<PathBuf>,
}

impl<F, E> Curator<F, E>
where
    F: FeedFetcher,
    E: ContentExtractor,
{
    pub fn new(config: NewsletterConfig, fetcher: F, extractor: E) -> Self {
        Self {
            config,
            fetcher,
            extractor,
            json_output: None,
        }
    }

    /// Also write the selected articles as JSON to `path`.
    pub fn with_json_output(mut self, path: impl Into<PathBuf>) -> Self {
        self.json_output = Some(path.into());
        self
    }

    pub fn config(&self) -> &NewsletterConfig {
        &self.config
    }

    /// Run every stage except analysis and write the newsletter to `output_path`.
    pub async fn run(&self, output_path: &Path) -> Result<CurationOutcome, Box<dyn Error>> {
        let selection = self.gather().await?;
        Ok(self.publish(selection, None, output_path).await)
    }

    /// Like [`Curator::run`], with an analysis step between enrichment and rendering.
    ///
    /// An analysis failure is logged and the run continues without commentary.
    pub async fn run_with_analysis<A>(
        &self,
        output_path: &Path,
        analyst: &A,
    ) -> Result<CurationOutcome, Box<dyn Error>>
    where
        A: AskAsync<Response = String>,
    {
        let selection = self.gather().await?;
        let analysis = if selection.articles.is_empty() {
            None
        } else {
            match analyze_articles(analyst, &selection.articles, self.config.analysis_sample).await {
                Ok(reply) => {
                    info!(preview = %truncate_for_log(&reply, 300), "Model analysis");
                    Some(reply)
                }
                Err(e) => {
                    warn!(error = %e, "Analysis unavailable; continuing without it");
                    None
                }
            }
        };
        Ok(self.publish(selection, analysis, output_path).await)
    }

    /// Fetch, select and enrich.
    ///
    /// # Errors
    ///
    /// Returns an error only for an unusable configuration.
    #[instrument(level = "info", skip_all)]
    pub async fn gather(&self) -> Result<Selection, Box<dyn Error>> {
        if let Err(e) = self.config.validate() {
            error!(error = %e, "Invalid newsletter configuration");
            return Err(e);
        }
        info!(
            lookback_days = self.config.lookback_days,
            "Starting newsletter curation (lookback window is not applied to selection)"
        );

        let fetched = self
            .fetcher
            .fetch(&self.config.sources, self.config.max_articles)
            .await;
        let fetched_count = fetched.len();
        info!(count = fetched_count, "Fetched articles");

        let mut selected = scoring::select(fetched, &self.config.keywords(), self.config.max_selected);
        info!(count = selected.len(), "Found relevant articles");

        let top = selected.len().min(self.config.enrich_count);
        enrich(&mut selected[..top], &self.extractor).await;

        Ok(Selection {
            fetched: fetched_count,
            articles: selected,
        })
    }

    /// Render `selection` and write it to `output_path`.
    ///
    /// Write failures are reported through [`CurationOutcome::WriteFailed`].
    #[instrument(level = "info", skip_all, fields(path = %output_path.display()))]
    pub async fn publish(
        &self,
        selection: Selection,
        analysis: Option<String>,
        output_path: &Path,
    ) -> CurationOutcome {
        let Selection { fetched, articles } = selection;
        let document = markdown::render_today(&articles, &self.config.title);
        let path = output_path.to_path_buf();

        if let Err(e) = write_document(&path, &document).await {
            let error = format!("Error saving newsletter: {e}");
            error!(path = %path.display(), error = %e, "Failed to write newsletter");
            return CurationOutcome::WriteFailed { path, error };
        }
        info!(path = %path.display(), bytes = document.len(), "Newsletter saved");

        if let Some(json_path) = &self.json_output {
            if let Err(e) = json::write_articles(&articles, json_path).await {
                error!(path = %json_path.display(), error = %e, "Failed to write JSON articles");
            }
        }

        if articles.is_empty() {
            warn!(fetched, "No relevant articles found; wrote an empty newsletter");
            CurationOutcome::NoRelevantArticles { path, fetched }
        } else {
            CurationOutcome::Published {
                path,
                stories: articles.len(),
                analysis,
            }
        }
    }
}

async fn write_document(path: &Path, document: &str) -> Result<(), Box<dyn Error>> {
    ensure_parent_dir(path).await?;
    tokio::fs::write(path, document).await?;
    Ok(())
}
