use chrono::{DateTime, Duration, Utc};

/// A repository returned by one of the search strategies.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepositoryRecord {
    pub id: u64,
    pub name: String,
    pub stars: u64,
    pub description: Option<String>,
    pub url: String,
    pub updated_at: Option<String>,
    pub language: Option<String>,
}

/// A news article returned by the news search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArticleRecord {
    pub title: String,
    pub source: Option<String>,
    pub published_at: Option<String>,
    pub description: Option<String>,
    pub url: String,
}

/// Which timestamp a repository search window applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateField {
    Created,
    Pushed,
}

impl DateField {
    fn qualifier(self) -> &'static str {
        match self {
            DateField::Created => "created",
            DateField::Pushed => "pushed",
        }
    }
}

/// One repository search strategy.
#[derive(Debug, Clone)]
pub struct RepoQuery {
    pub label: String,
    pub keywords: Vec<String>,
    pub date_field: DateField,
    pub window_days: i64,
    pub min_stars: u32,
    pub language: Option<String>,
    pub limit: u32,
}

impl RepoQuery {
    pub fn new(label: impl Into<String>, keywords: &[&str]) -> Self {
        Self {
            label: label.into(),
            keywords: keywords.iter().map(|k| k.to_string()).collect(),
            date_field: DateField::Created,
            window_days: 3,
            min_stars: 20,
            language: None,
            limit: 10,
        }
    }

    pub fn window(mut self, date_field: DateField, days: i64) -> Self {
        self.date_field = date_field;
        self.window_days = days;
        self
    }

    pub fn min_stars(mut self, min_stars: u32) -> Self {
        self.min_stars = min_stars;
        self
    }

    pub fn language(mut self, language: impl Into<String>) -> Self {
        self.language = Some(language.into());
        self
    }

    pub fn limit(mut self, limit: u32) -> Self {
        self.limit = limit;
        self
    }

    /// Renders the GitHub search expression, e.g.
    /// `AI OR LLM created:>2026-10-16 stars:>20 language:Python`.
    pub fn search_expression(&self, now: DateTime<Utc>) -> String {
        let since = (now - Duration::days(self.window_days)).format("%Y-%m-%d");

        let mut parts = vec![
            self.keywords
                .iter()
                .map(|k| quote_keyword(k))
                .collect::<Vec<_>>()
                .join(" OR "),
            format!("{}:>{}", self.date_field.qualifier(), since),
            format!("stars:>{}", self.min_stars),
        ];
        if let Some(language) = &self.language {
            parts.push(format!("language:{}", language));
        }

        parts.retain(|p| !p.is_empty());
        parts.join(" ")
    }
}

/// One news search.
#[derive(Debug, Clone)]
pub struct NewsQuery {
    pub label: String,
    pub query: String,
    pub language: String,
    pub window_days: i64,
    pub limit: u32,
}

impl NewsQuery {
    pub fn new(label: impl Into<String>, query: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            query: query.into(),
            language: "en".to_string(),
            window_days: 1,
            limit: 10,
        }
    }

    /// Inclusive `(from, to)` date bounds as NewsAPI expects them.
    pub fn date_range(&self, now: DateTime<Utc>) -> (String, String) {
        let from = now - Duration::days(self.window_days);
        (
            from.format("%Y-%m-%d").to_string(),
            now.format("%Y-%m-%d").to_string(),
        )
    }
}

fn quote_keyword(keyword: &str) -> String {
    if keyword.contains(char::is_whitespace) {
        format!("\"{}\"", keyword)
    } else {
        keyword.to_string()
    }
}

/// The three repository strategies run on every digest.
pub fn default_repo_strategies() -> Vec<RepoQuery> {
    vec![
        RepoQuery::new("new-ai-projects", &["AI", "LLM", "agent"])
            .window(DateField::Created, 3)
            .min_stars(20)
            .language("Python"),
        RepoQuery::new("rising-llm-tooling", &["LLM", "RAG", "language model"])
            .window(DateField::Pushed, 1)
            .min_stars(200),
        RepoQuery::new("agent-frameworks", &["agent", "MCP", "AI agent"])
            .window(DateField::Created, 7)
            .min_stars(50),
    ]
}

pub fn ai_news_query() -> NewsQuery {
    NewsQuery::new(
        "ai-news",
        "ChatGPT OR OpenAI OR \"generative AI\" OR \"AI model\"",
    )
}

pub fn economy_news_query() -> NewsQuery {
    NewsQuery::new(
        "economy-news",
        "economy OR inflation OR \"interest rates\" OR \"stock market\"",
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_search_expression_with_language() {
        let now = Utc.with_ymd_and_hms(2026, 10, 19, 8, 0, 0).unwrap();
        let query = RepoQuery::new("x", &["AI", "LLM", "agent"])
            .window(DateField::Created, 3)
            .min_stars(20)
            .language("Python");

        assert_eq!(
            query.search_expression(now),
            "AI OR LLM OR agent created:>2026-10-16 stars:>20 language:Python"
        );
    }

    #[test]
    fn test_search_expression_quotes_phrases() {
        let now = Utc.with_ymd_and_hms(2026, 10, 19, 8, 0, 0).unwrap();
        let query = RepoQuery::new("x", &["RAG", "language model"])
            .window(DateField::Pushed, 1)
            .min_stars(200);

        assert_eq!(
            query.search_expression(now),
            "RAG OR \"language model\" pushed:>2026-10-18 stars:>200"
        );
    }

    #[test]
    fn test_news_date_range_crosses_month() {
        let now = Utc.with_ymd_and_hms(2026, 11, 1, 0, 30, 0).unwrap();
        let (from, to) = ai_news_query().date_range(now);
        assert_eq!(from, "2026-10-31");
        assert_eq!(to, "2026-11-01");
    }

    #[test]
    fn test_default_strategies() {
        let strategies = default_repo_strategies();
        assert_eq!(strategies.len(), 3);
        assert!(strategies.iter().all(|s| s.limit > 0 && !s.keywords.is_empty()));
    }
}
