//! JSON sidecar of the curated selection.
//!
//! Alongside the markdown newsletter, the selected articles can be written as
//! a pretty-printed JSON array for other tools to consume. Scores and any
//! scraped content are included.

use crate::models::Article;
use crate::utils::ensure_parent_dir;
use std::error::Error;
use std::path::Path;
use tokio::fs;
use tracing::{info, instrument};

/// Write `articles` as a JSON array to `path`, creating parent directories.
///
/// # Errors
///
/// Returns an error if serialization, directory creation, or the write fails.
#[instrument(level = "info", skip_all, fields(path = %path.display(), count = articles.len()))]
pub async fn write_articles(articles: &[Article], path: &Path) -> Result<(), Box<dyn Error>> {
    let json = serde_json::to_string_pretty(articles)?;
    ensure_parent_dir(path).await?;
    fs::write(path, json).await?;
    info!("Wrote JSON article file");
    Ok(())
}
