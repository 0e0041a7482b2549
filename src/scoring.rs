//! Keyword relevance scoring and selection.
//!
//! An article's score is the number of distinct keywords found, as
//! case-insensitive substrings, in its title and description. Keywords that
//! differ only by case count once, and repeated occurrences in the text add
//! nothing.
//!
//! Selection drops every article scoring zero, orders the rest by score
//! (highest first, ties in input order) and keeps the first `limit`.

use crate::models::Article;
use itertools::Itertools;
use tracing::{debug, info, instrument};

/// Lowercase and de-duplicate a keyword list, preserving first occurrence.
fn normalize_keywords(keywords: &[String]) -> Vec<String> {
    keywords.iter().map(|k| k.to_lowercase()).unique().collect()
}

/// Count the distinct `keywords` present in `article`'s title and description.
pub fn score(article: &Article, keywords: &[String]) -> u32 {
    let text = article.search_text();
    normalize_keywords(keywords)
        .iter()
        .filter(|k| text.contains(k.as_str()))
        .count() as u32
}

/// Score `articles`, discard non-matches, and return the top `limit`.
///
/// Every returned article has `relevance_score` set to a positive value. The
/// sort is stable, so articles with equal scores keep the order in which they
/// arrived.
#[instrument(level = "info", skip_all, fields(articles = articles.len(), keywords = keywords.len(), limit = limit))]
pub fn select(articles: Vec<Article>, keywords: &[String], limit: usize) -> Vec<Article> {
    let mut scored = articles
        .into_iter()
        .filter_map(|mut article| {
            let score = score(&article, keywords);
            if score == 0 {
                return None;
            }
            debug!(title = %article.title, score, "Article matched keywords");
            article.relevance_score = Some(score);
            Some(article)
        })
        .collect::<Vec<_>>();

    let matched = scored.len();
    scored.sort_by(|a, b| b.relevance_score.cmp(&a.relevance_score));
    scored.truncate(limit);

    info!(matched, selected = scored.len(), "Selected relevant articles");
    scored
}

#[cfg(test)]
mod tests {
    use super::*;

    fn article(title: &str, description: &str) -> Article {
        Article {
            title: title.to_string(),
            description: description.to_string(),
            link: format!("https://example.com/{}", title.replace(' ', "-")),
            ..Default::default()
        }
    }

    fn keywords(words: &[&str]) -> Vec<String> {
        words.iter().map(|w| w.to_string()).collect()
    }

    #[test]
    fn test_score_counts_case_insensitive_substrings() {
        let a = article("New LLM released", "A generative AI breakthrough");
        assert_eq!(score(&a, &keywords(&["AI", "LLM", "robotics"])), 2);
    }

    #[test]
    fn test_score_ignores_repeated_occurrences() {
        let a = article("AI AI AI", "more ai and AI");
        assert_eq!(score(&a, &keywords(&["ai"])), 1);
    }

    #[test]
    fn test_score_deduplicates_keywords_by_case() {
        let a = article("AI news", "");
        assert_eq!(score(&a, &keywords(&["AI", "ai", "Ai"])), 1);
    }

    #[test]
    fn test_score_spans_title_description_join() {
        // "web development" only exists across the joining space.
        let a = article("Modern web", "development practices");
        assert_eq!(score(&a, &keywords(&["web development"])), 1);
    }

    #[test]
    fn test_select_drops_zero_scores() {
        let articles = vec![
            article("Gardening tips", "Tomatoes"),
            article("Robotics today", ""),
        ];
        let selected = select(articles, &keywords(&["robotics"]), 10);
        assert_eq!(selected.len(), 1);
        assert_eq!(selected[0].title, "Robotics today");
        assert_eq!(selected[0].relevance_score, Some(1));
    }

    #[test]
    fn test_select_orders_by_score_and_keeps_ties_stable() {
        let articles = vec![
            article("tie one ai", ""),
            article("best ai llm gpt", ""),
            article("tie two ai", ""),
            article("middle ai llm", ""),
            article("tie three ai", ""),
        ];
        let selected = select(articles, &keywords(&["ai", "llm", "gpt"]), 10);
        let titles = selected.iter().map(|a| a.title.as_str()).collect::<Vec<_>>();
        assert_eq!(
            titles,
            vec!["best ai llm gpt", "middle ai llm", "tie one ai", "tie two ai", "tie three ai"]
        );
        assert!(selected
            .windows(2)
            .all(|w| w[0].relevance_score >= w[1].relevance_score));
    }

    #[test]
    fn test_select_respects_limit() {
        let articles = (0..10).map(|i| article(&format!("ai story {i}"), "")).collect::<Vec<_>>();
        let selected = select(articles, &keywords(&["ai"]), 3);
        assert_eq!(selected.len(), 3);
        assert_eq!(selected[0].title, "ai story 0");
        assert_eq!(selected[2].title, "ai story 2");
    }

    #[test]
    fn test_select_never_exceeds_input() {
        let articles = vec![article("ai", "")];
        assert_eq!(select(articles, &keywords(&["ai"]), 15).len(), 1);
        assert!(select(vec![], &keywords(&["ai"]), 15).is_empty());
    }

    #[test]
    fn test_select_with_no_keywords_returns_nothing() {
        let articles = vec![article("ai", "llm")];
        assert!(select(articles, &[], 15).is_empty());
    }
}
