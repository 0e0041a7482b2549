//! Markdown rendering of a curated newsletter.
//!
//! # Layout
//!
//! ```text
//! # {title}
//! *{date}*
//!
//! {intro}
//!
//! ## 🔥 Top Stories          <- first five articles, numbered
//! ## 📖 Additional Reading   <- only when more than five articles
//! ## 🤖 About This Newsletter
//!
//! *Generated on {date}*
//! ```
//!
//! Rendering is pure: the same articles, title and date always produce the
//! same bytes.

use crate::models::Article;
use chrono::{Local, NaiveDate};

/// Number of articles given a full entry under "Top Stories".
pub const TOP_STORIES: usize = 5;

const INTRO: &str = "Welcome to this week's curated selection of AI and technology news. \
Here are the most important stories and developments:";

const ABOUT: &str = "This newsletter was curated by an AI agent using the latest developments \
in artificial intelligence and technology.\n\
Articles were automatically selected based on relevance, novelty, and potential impact.";

const NO_DESCRIPTION: &str = "No description available.";

/// Format a date the way the newsletter prints it, e.g. `March 05, 2025`.
pub fn format_date(date: NaiveDate) -> String {
    date.format("%B %d, %Y").to_string()
}

/// Render `articles` into a newsletter dated `date`.
pub fn render(articles: &[Article], title: &str, date: NaiveDate) -> String {
    let date = format_date(date);
    let mut md = format!("# {title}\n*{date}*\n\n{INTRO}\n\n## 🔥 Top Stories\n\n");

    for (i, article) in articles.iter().take(TOP_STORIES).enumerate() {
        md.push_str(&top_story(i + 1, article));
    }

    if articles.len() > TOP_STORIES {
        md.push_str("\n## 📖 Additional Reading\n\n");
        for article in &articles[TOP_STORIES..] {
            md.push_str(&format!(
                "- [{}]({}) - *{}*\n",
                article.title,
                article.link,
                article.domain()
            ));
        }
    }

    md.push_str(&format!(
        "\n\n## 🤖 About This Newsletter\n\n{ABOUT}\n\n*Generated on {date}*\n"
    ));
    md
}

/// Render `articles` into a newsletter dated with today's local date.
pub fn render_today(articles: &[Article], title: &str) -> String {
    render(articles, title, Local::now().date_naive())
}

fn top_story(index: usize, article: &Article) -> String {
    let description = if article.description.trim().is_empty() {
        NO_DESCRIPTION
    } else {
        article.description.as_str()
    };

    // Two trailing spaces after the source force a markdown line break.
    format!(
        "### {index}. {title}\n\n**Source:** {domain}  \n**Link:** [{title}]({link})\n\n{description}\n\n---\n\n",
        title = article.title,
        domain = article.domain(),
        link = article.link,
    )
}
