use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::Deserialize;
use url::Url;

use crate::models::{RepoQuery, RepositoryRecord};
use crate::ports::RepoSearch;

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    items: Vec<GitHubRepo>,
}

#[derive(Debug, Deserialize)]
struct GitHubRepo {
    id: u64,
    full_name: String,
    stargazers_count: u64,
    description: Option<String>,
    html_url: String,
    updated_at: Option<String>,
    language: Option<String>,
}

impl From<GitHubRepo> for RepositoryRecord {
    fn from(repo: GitHubRepo) -> Self {
        Self {
            id: repo.id,
            name: repo.full_name,
            stars: repo.stargazers_count,
            description: repo.description,
            url: repo.html_url,
            updated_at: repo.updated_at,
            language: repo.language,
        }
    }
}

pub struct GitHubClient {
    client: Client,
    api_token: String,
    base_url: Url,
}

impl GitHubClient {
    pub fn new(api_token: String, base_url: Url) -> Result<Self> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(20))
            .user_agent(concat!("ai-daily-digest/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            api_token,
            base_url,
        })
    }

    fn search_url(&self, query: &RepoQuery, now: DateTime<Utc>) -> Result<String> {
        let endpoint = self
            .base_url
            .join("search/repositories")
            .context("Invalid GitHub API base URL")?;

        Ok(format!(
            "{}?q={}&sort=stars&order=desc&per_page={}",
            endpoint,
            urlencoding::encode(&query.search_expression(now)),
            query.limit
        ))
    }
}

#[async_trait]
impl RepoSearch for GitHubClient {
    async fn search(&self, query: &RepoQuery, now: DateTime<Utc>) -> Result<Vec<RepositoryRecord>> {
        let url = self.search_url(query, now)?;

        let response = self
            .client
            .get(&url)
            .header("Authorization", format!("Bearer {}", self.api_token))
            .header("Accept", "application/vnd.github+json")
            .header("X-GitHub-Api-Version", "2022-11-28")
            .send()
            .await
            .context("Failed to reach GitHub search API")?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| String::from("unknown error"));
            anyhow::bail!("GitHub API returned error: {} - {}", status, error_text);
        }

        let search_response = response
            .json::<SearchResponse>()
            .await
            .context("Failed to parse GitHub search response")?;

        Ok(search_response
            .items
            .into_iter()
            .map(RepositoryRecord::from)
            .collect())
    }
}
