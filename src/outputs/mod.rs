//! Output generation for the curated newsletter.
//!
//! # Submodules
//!
//! - [`markdown`]: Renders selected articles into the newsletter document
//! - [`json`]: Writes the selected articles to an optional JSON sidecar
//!
//! Rendering is pure; only [`json::write_articles`] and the pipeline's
//! persist step touch the filesystem.

pub mod json;
pub mod markdown;
