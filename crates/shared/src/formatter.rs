use chrono::{DateTime, Utc};
use scraper::Html;

use crate::models::{ArticleRecord, RepositoryRecord};

pub const DESCRIPTION_CHAR_BUDGET: usize = 200;

const NO_DESCRIPTION: &str = "No description";
const UNKNOWN_SOURCE: &str = "Unknown source";
const UNKNOWN_DATE: &str = "Unknown date";

pub fn format_repositories(repos: &[RepositoryRecord]) -> String {
    if repos.is_empty() {
        return "No repositories matched today.".to_string();
    }

    repos
        .iter()
        .enumerate()
        .map(|(idx, repo)| {
            let header = match &repo.language {
                Some(language) => format!("{}. {} (★ {}, {})", idx + 1, repo.name, repo.stars, language),
                None => format!("{}. {} (★ {})", idx + 1, repo.name, repo.stars),
            };
            format!(
                "{}\n   {}\n   Updated: {}\n   {}",
                header,
                describe(repo.description.as_deref().map(collapse_whitespace)),
                format_timestamp(repo.updated_at.as_deref()),
                repo.url
            )
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}

pub fn format_articles(articles: &[ArticleRecord]) -> String {
    if articles.is_empty() {
        return "No articles found.".to_string();
    }

    articles
        .iter()
        .enumerate()
        .map(|(idx, article)| {
            format!(
                "{}. {}\n   Source: {} | Published: {}\n   {}\n   {}",
                idx + 1,
                article.title,
                article.source.as_deref().unwrap_or(UNKNOWN_SOURCE),
                format_timestamp(article.published_at.as_deref()),
                describe(article.description.as_deref().map(strip_markup)),
                article.url
            )
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}

fn describe(cleaned: Option<String>) -> String {
    let cleaned = cleaned.unwrap_or_default();
    if cleaned.is_empty() {
        return NO_DESCRIPTION.to_string();
    }
    truncate_chars(&cleaned, DESCRIPTION_CHAR_BUDGET)
}

/// Cuts `text` to at most `budget` characters, marking the cut with `...`.
pub fn truncate_chars(text: &str, budget: usize) -> String {
    match text.char_indices().nth(budget) {
        Some((byte_idx, _)) => format!("{}...", text[..byte_idx].trim_end()),
        None => text.to_string(),
    }
}

/// Repository descriptions are plain text, so `<` is kept as written.
pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Drops any HTML markup and collapses whitespace to single spaces.
/// Only for news descriptions, which NewsAPI passes through as HTML snippets.
pub fn strip_markup(text: &str) -> String {
    let plain = if text.contains('<') || text.contains('&') {
        Html::parse_fragment(text)
            .root_element()
            .text()
            .collect::<String>()
    } else {
        text.to_string()
    };

    collapse_whitespace(&plain)
}

fn format_timestamp(raw: Option<&str>) -> String {
    match raw {
        Some(s) if !s.trim().is_empty() => match s.parse::<DateTime<Utc>>() {
            Ok(dt) => dt.format("%Y-%m-%d %H:%M UTC").to_string(),
            Err(_) => s.to_string(),
        },
        _ => UNKNOWN_DATE.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn repo(description: Option<&str>) -> RepositoryRecord {
        RepositoryRecord {
            id: 1,
            name: "acme/agentkit".to_string(),
            stars: 420,
            description: description.map(String::from),
            url: "https://github.com/acme/agentkit".to_string(),
            updated_at: Some("2026-10-18T09:12:00Z".to_string()),
            language: Some("Python".to_string()),
        }
    }

    // ==================== Repository Formatting Tests ====================

    #[test]
    fn test_format_repositories_entry() {
        let text = format_repositories(&[repo(Some("Agents, but tidy"))]);

        assert_eq!(
            text,
            "1. acme/agentkit (★ 420, Python)\n   Agents, but tidy\n   Updated: 2026-10-18 09:12 UTC\n   https://github.com/acme/agentkit"
        );
    }

    #[test]
    fn test_format_repositories_placeholders() {
        let mut r = repo(None);
        r.language = None;
        r.updated_at = None;

        let text = format_repositories(&[r]);

        assert!(text.starts_with("1. acme/agentkit (★ 420)\n"));
        assert!(text.contains("No description"));
        assert!(text.contains("Updated: Unknown date"));
    }

    #[test]
    fn test_format_repositories_numbering_and_separator() {
        let text = format_repositories(&[repo(None), repo(None)]);
        assert!(text.contains("https://github.com/acme/agentkit\n\n2. acme/agentkit"));
    }

    #[test]
    fn test_repository_description_keeps_angle_brackets() {
        let text = format_repositories(&[repo(Some("Typed Vec<T> helpers,\n  if a<b then Result<String, Error>"))]);

        assert!(text.contains("   Typed Vec<T> helpers, if a<b then Result<String, Error>\n"));
    }

    #[test]
    fn test_format_repositories_empty() {
        assert_eq!(format_repositories(&[]), "No repositories matched today.");
    }

    #[test]
    fn test_long_description_truncated() {
        let long = "x".repeat(DESCRIPTION_CHAR_BUDGET + 50);
        let text = format_repositories(&[repo(Some(&long))]);

        let expected = format!("{}...", "x".repeat(DESCRIPTION_CHAR_BUDGET));
        assert!(text.contains(&expected));
        assert!(!text.contains(&"x".repeat(DESCRIPTION_CHAR_BUDGET + 1)));
    }

    // ==================== Article Formatting Tests ====================

    #[test]
    fn test_format_articles_entry() {
        let article = ArticleRecord {
            title: "Chip exports rise".to_string(),
            source: Some("Wire".to_string()),
            published_at: Some("2026-10-18T22:10:00Z".to_string()),
            description: Some("Shipments <b>up</b> 12%.".to_string()),
            url: "https://wire.example.com/chips".to_string(),
        };

        let text = format_articles(&[article]);

        assert_eq!(
            text,
            "1. Chip exports rise\n   Source: Wire | Published: 2026-10-18 22:10 UTC\n   Shipments up 12%.\n   https://wire.example.com/chips"
        );
    }

    #[test]
    fn test_format_articles_placeholders() {
        let article = ArticleRecord {
            title: "Untitled wire".to_string(),
            source: None,
            published_at: Some("yesterday".to_string()),
            description: None,
            url: "https://example.com".to_string(),
        };

        let text = format_articles(&[article]);

        assert!(text.contains("Source: Unknown source | Published: yesterday"));
        assert!(text.contains("No description"));
    }

    #[test]
    fn test_format_articles_empty() {
        assert_eq!(format_articles(&[]), "No articles found.");
    }

    // ==================== Helper Tests ====================

    #[test]
    fn test_truncate_chars_respects_multibyte() {
        let text = "生成式人工智能模型";
        assert_eq!(truncate_chars(text, 4), "生成式人...");
        assert_eq!(truncate_chars(text, 20), text);
    }

    #[test]
    fn test_truncate_chars_exact_budget_untouched() {
        assert_eq!(truncate_chars("abcde", 5), "abcde");
    }

    #[test]
    fn test_strip_markup_decodes_entities() {
        assert_eq!(strip_markup("<p>Fast &amp; cheap</p>\n  <p>inference</p>"), "Fast & cheap inference");
    }

    #[test]
    fn test_strip_markup_plain_text_collapses_whitespace() {
        assert_eq!(strip_markup("  a\n\tb  "), "a b");
    }
}
