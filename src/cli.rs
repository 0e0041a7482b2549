//! Command-line interface definitions for the newsletter curator.
//!
//! All arguments can be provided via command-line flags; the commonly scripted
//! ones can also come from environment variables.

use clap::Parser;
use std::path::PathBuf;

/// Command-line arguments for the newsletter curator.
///
/// # Examples
///
/// ```sh
/// # Built-in feeds and keywords, default output file
/// newsletter_curator
///
/// # Custom configuration and output location
/// newsletter_curator -c newsletter.yaml -o out/weekly.md
///
/// # Ask a local model for editorial commentary as well
/// newsletter_curator --analyze --template newsletter_curator
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Path of the markdown newsletter to write
    #[arg(short, long, env = "NEWSLETTER_OUTPUT", default_value = "ai_tech_newsletter.md")]
    pub output: PathBuf,

    /// Optional YAML file overriding the built-in feeds, keywords and limits
    #[arg(short, long, env = "NEWSLETTER_CONFIG")]
    pub config: Option<PathBuf>,

    /// Newsletter title (overrides the configured one)
    #[arg(short, long)]
    pub title: Option<String>,

    /// Also write the selected articles as JSON to this path
    #[arg(short, long)]
    pub json_output: Option<PathBuf>,

    /// Ask a language model to comment on the selection (advisory only)
    #[arg(long)]
    pub analyze: bool,

    /// Model backend config.yaml (defaults to the awful_aj config directory)
    #[arg(long, env = "AJ_CONFIG")]
    pub aj_config: Option<PathBuf>,

    /// Prompt template name used for the analysis
    #[arg(long, default_value = "newsletter_curator")]
    pub template: String,

    /// Retries for the model call after the first attempt
    #[arg(long, default_value_t = 2)]
    pub analysis_retries: usize,
}
