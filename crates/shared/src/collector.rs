use chrono::{DateTime, Utc};
use futures::stream::{self, StreamExt};

use crate::models::{ArticleRecord, NewsQuery, RepoQuery, RepositoryRecord};
use crate::ports::{NewsSearch, RepoSearch};

/// Runs searches one after another. A failing search is logged and
/// contributes an empty list; nothing here returns an error.
pub struct Collector {
    repos: Box<dyn RepoSearch>,
    news: Box<dyn NewsSearch>,
}

impl Collector {
    pub fn new(repos: Box<dyn RepoSearch>, news: Box<dyn NewsSearch>) -> Self {
        Self { repos, news }
    }

    /// One list per strategy, in strategy order.
    pub async fn collect_repositories(
        &self,
        strategies: &[RepoQuery],
        now: DateTime<Utc>,
    ) -> Vec<Vec<RepositoryRecord>> {
        stream::iter(strategies)
            .then(|strategy| async move {
                match self.repos.search(strategy, now).await {
                    Ok(repos) => {
                        tracing::info!(
                            strategy = %strategy.label,
                            count = repos.len(),
                            "repository search finished"
                        );
                        repos
                    }
                    Err(e) => {
                        tracing::warn!(
                            strategy = %strategy.label,
                            error = %format!("{:#}", e),
                            "repository search failed, continuing without it"
                        );
                        Vec::new()
                    }
                }
            })
            .collect()
            .await
    }

    pub async fn collect_articles(&self, query: &NewsQuery, now: DateTime<Utc>) -> Vec<ArticleRecord> {
        match self.news.search(query, now).await {
            Ok(articles) => {
                tracing::info!(query = %query.label, count = articles.len(), "news search finished");
                articles
            }
            Err(e) => {
                tracing::warn!(
                    query = %query.label,
                    error = %format!("{:#}", e),
                    "news search failed, continuing without it"
                );
                Vec::new()
            }
        }
    }
}
