use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::Deserialize;
use url::Url;

use crate::models::{ArticleRecord, NewsQuery};
use crate::ports::NewsSearch;

/// Title NewsAPI substitutes for articles pulled by the publisher.
const REMOVED_MARKER: &str = "[Removed]";

#[derive(Debug, Deserialize)]
struct NewsApiResponse {
    status: String,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    articles: Vec<NewsArticle>,
}

#[derive(Debug, Deserialize)]
struct NewsArticle {
    source: Option<NewsSource>,
    title: Option<String>,
    description: Option<String>,
    url: Option<String>,
    #[serde(rename = "publishedAt")]
    published_at: Option<String>,
}

#[derive(Debug, Deserialize)]
struct NewsSource {
    name: Option<String>,
}

impl NewsArticle {
    fn into_record(self) -> Option<ArticleRecord> {
        let title = self.title.filter(|t| t != REMOVED_MARKER && !t.trim().is_empty())?;
        let url = self.url.filter(|u| !u.trim().is_empty())?;

        Some(ArticleRecord {
            title,
            source: self.source.and_then(|s| s.name),
            published_at: self.published_at,
            description: self.description,
            url,
        })
    }
}

pub struct NewsApiClient {
    client: Client,
    api_key: String,
    base_url: Url,
}

impl NewsApiClient {
    pub fn new(api_key: String, base_url: Url) -> Result<Self> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(20))
            .user_agent(concat!("ai-daily-digest/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            api_key,
            base_url,
        })
    }

    fn everything_url(&self, query: &NewsQuery, now: DateTime<Utc>) -> Result<String> {
        let endpoint = self
            .base_url
            .join("v2/everything")
            .context("Invalid NewsAPI base URL")?;
        let (from, to) = query.date_range(now);

        Ok(format!(
            "{}?q={}&language={}&from={}&to={}&sortBy=publishedAt&pageSize={}",
            endpoint,
            urlencoding::encode(&query.query),
            urlencoding::encode(&query.language),
            from,
            to,
            query.limit
        ))
    }
}

#[async_trait]
impl NewsSearch for NewsApiClient {
    async fn search(&self, query: &NewsQuery, now: DateTime<Utc>) -> Result<Vec<ArticleRecord>> {
        let url = self.everything_url(query, now)?;

        let response = self
            .client
            .get(&url)
            .header("X-Api-Key", &self.api_key)
            .send()
            .await
            .context("Failed to reach NewsAPI")?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| String::from("unknown error"));
            anyhow::bail!("NewsAPI returned error: {} - {}", status, error_text);
        }

        let news_response = response
            .json::<NewsApiResponse>()
            .await
            .context("Failed to parse NewsAPI response")?;

        if news_response.status != "ok" {
            anyhow::bail!(
                "NewsAPI returned status {}: {}",
                news_response.status,
                news_response.message.unwrap_or_default()
            );
        }

        Ok(news_response
            .articles
            .into_iter()
            .filter_map(NewsArticle::into_record)
            .collect())
    }
}
