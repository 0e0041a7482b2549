//! # Newsletter Curator
//!
//! Builds a short markdown newsletter of AI and technology stories from a set
//! of RSS/Atom feeds.
//!
//! ## Features
//!
//! - Reads a configurable list of feeds (built-in: O'Reilly Radar, Hacker
//!   News, TechCrunch, The Verge, VentureBeat, Wired)
//! - Scores every entry by how many AI/tech keywords its title and summary mention
//! - Scrapes the body text of the top stories
//! - Optionally asks an OpenAI-compatible model for editorial commentary
//! - Writes a markdown newsletter, plus an optional JSON sidecar
//!
//! ## Usage
//!
//! ```sh
//! newsletter_curator -o ai_tech_newsletter.md
//! ```
//!
//! ## Architecture
//!
//! The application follows a sequential pipeline:
//! 1. **Fetching**: Read every configured feed (failed feeds are skipped)
//! 2. **Selection**: Keep the best keyword matches, highest score first
//! 3. **Enrichment**: Scrape page text for the leading stories
//! 4. **Analysis**: Optional, advisory model commentary
//! 5. **Output**: Render and write the markdown newsletter

use awful_aj::{config as aj_config, config_dir, template};
use clap::Parser;
use std::error::Error;
use std::time::Duration;
use tracing::{debug, error, info, instrument, warn};
use tracing_subscriber::{EnvFilter, fmt as tfmt};

mod api;
mod cli;
mod config;
mod models;
mod outputs;
mod pipeline;
mod scoring;
mod scrapers;
mod utils;

use api::{AskFnWrapper, RetryAsk};
use cli::Cli;
use config::NewsletterConfig;
use pipeline::{CurationOutcome, Curator};
use scrapers::content::HttpContentExtractor;
use scrapers::feeds::HttpFeedFetcher;
use scrapers::build_client;
use utils::truncate_for_log;

#[tokio::main]
#[instrument]
async fn main() -> Result<(), Box<dyn Error>> {
    // --- Tracing init ---
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();

    let start_time = std::time::Instant::now();
    info!("newsletter_curator starting up");

    let args = Cli::parse();
    debug!(?args.output, ?args.config, analyze = args.analyze, "Parsed CLI arguments");

    // ---- Configuration ----
    let mut config = match &args.config {
        Some(path) => NewsletterConfig::load(path).await.inspect_err(|e| {
            error!(path = %path.display(), error = %e, "Failed to load newsletter configuration");
        })?,
        None => NewsletterConfig::default(),
    };
    if let Some(title) = &args.title {
        config.title = title.clone();
    }

    // ---- Collectors ----
    let client = build_client(&config)?;
    let fetcher = HttpFeedFetcher::new(client.clone());
    let extractor = HttpContentExtractor::new(client, config.content_max_chars);

    let mut curator = Curator::new(config, fetcher, extractor);
    if let Some(json_path) = &args.json_output {
        curator = curator.with_json_output(json_path);
    }
    info!(
        sources = curator.config().sources.len(),
        title = %curator.config().title,
        "Curator ready"
    );

    // ---- Run ----
    let outcome = if args.analyze {
        let conf_file = match &args.aj_config {
            Some(path) => path.clone(),
            None => config_dir()?.join("config.yaml"),
        };
        let config_path = conf_file
            .to_str()
            .ok_or_else(|| format!("model config path is not valid UTF-8: {}", conf_file.display()))?;
        let model_config = aj_config::load_config(config_path).map_err(|e| e.to_string())?;
        info!(config_path, "Loaded model configuration");
        let template = template::load_template(&args.template).await?;
        info!(template = %args.template, "Loaded template");

        let analyst = RetryAsk::new(
            AskFnWrapper {
                config: &model_config,
                template: &template,
            },
            args.analysis_retries,
            Duration::from_secs(1),
        );
        curator.run_with_analysis(&args.output, &analyst).await
    } else {
        curator.run(&args.output).await
    };

    let outcome = outcome.inspect_err(|e| error!(error = %e, "Error in newsletter curation"))?;
    let elapsed = start_time.elapsed();

    match outcome {
        CurationOutcome::Published {
            path,
            stories,
            analysis,
        } => {
            if let Some(analysis) = analysis {
                info!(analysis = %truncate_for_log(&analysis, 2000), "Editorial analysis");
            }
            info!(path = %path.display(), stories, ?elapsed, "Newsletter generated successfully");
            Ok(())
        }
        CurationOutcome::NoRelevantArticles { path, fetched } => {
            warn!(path = %path.display(), fetched, ?elapsed, "Newsletter written without stories");
            Ok(())
        }
        CurationOutcome::WriteFailed { path, error } => {
            error!(path = %path.display(), %error, ?elapsed, "Newsletter could not be saved");
            Err(error.into())
        }
    }
}
