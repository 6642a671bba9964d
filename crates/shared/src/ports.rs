use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::mailer::DigestMessage;
use crate::models::{ArticleRecord, NewsQuery, RepoQuery, RepositoryRecord};

#[async_trait]
pub trait RepoSearch: Send + Sync {
    async fn search(&self, query: &RepoQuery, now: DateTime<Utc>) -> Result<Vec<RepositoryRecord>>;
}

#[async_trait]
pub trait NewsSearch: Send + Sync {
    async fn search(&self, query: &NewsQuery, now: DateTime<Utc>) -> Result<Vec<ArticleRecord>>;
}

#[async_trait]
pub trait Completion: Send + Sync {
    async fn complete(&self, prompt: &str) -> Result<String>;
}

#[async_trait]
pub trait Notifier: Send + Sync {
    async fn send(&self, message: &DigestMessage) -> Result<()>;
}
