use anyhow::{Context, Result};
use chrono::{DateTime, Local, Utc};

use crate::collector::Collector;
use crate::formatter::{format_articles, format_repositories};
use crate::mailer::DigestMessage;
use crate::merge::{merge_repositories, MAX_MERGED_REPOSITORIES};
use crate::models::{NewsQuery, RepoQuery};
use crate::ports::Notifier;
use crate::summarizer::{DigestBlocks, Summarizer, Summary};

/// What a digest run produced.
#[derive(Debug)]
pub struct DigestReport {
    pub repositories: usize,
    pub ai_articles: usize,
    pub economy_articles: usize,
    pub summary: Summary,
    pub message: DigestMessage,
}

/// The search plan for one run.
#[derive(Debug, Clone)]
pub struct DigestPlan {
    pub strategies: Vec<RepoQuery>,
    pub ai_news: NewsQuery,
    pub economy_news: NewsQuery,
    pub max_repositories: usize,
}

impl Default for DigestPlan {
    fn default() -> Self {
        Self {
            strategies: crate::models::default_repo_strategies(),
            ai_news: crate::models::ai_news_query(),
            economy_news: crate::models::economy_news_query(),
            max_repositories: MAX_MERGED_REPOSITORIES,
        }
    }
}

pub struct DigestPipeline {
    collector: Collector,
    summarizer: Summarizer,
    notifier: Box<dyn Notifier>,
    plan: DigestPlan,
}

impl DigestPipeline {
    pub fn new(
        collector: Collector,
        summarizer: Summarizer,
        notifier: Box<dyn Notifier>,
        plan: DigestPlan,
    ) -> Self {
        Self {
            collector,
            summarizer,
            notifier,
            plan,
        }
    }

    /// Collect, merge, format, summarize, deliver.
    ///
    /// Search and summarization failures degrade the digest; only a
    /// delivery failure is returned as an error.
    pub async fn run(&self, now: DateTime<Utc>) -> Result<DigestReport> {
        let repo_lists = self
            .collector
            .collect_repositories(&self.plan.strategies, now)
            .await;
        let repositories = merge_repositories(repo_lists, self.plan.max_repositories);

        let ai_articles = self.collector.collect_articles(&self.plan.ai_news, now).await;
        let economy_articles = self
            .collector
            .collect_articles(&self.plan.economy_news, now)
            .await;

        tracing::info!(
            repositories = repositories.len(),
            ai_articles = ai_articles.len(),
            economy_articles = economy_articles.len(),
            "material collected"
        );

        let blocks = DigestBlocks {
            repositories: format_repositories(&repositories),
            ai_news: format_articles(&ai_articles),
            economy_news: format_articles(&economy_articles),
        };

        let summary = self.summarizer.summarize(&blocks).await;
        let message = DigestMessage::new(summary.text(), now.with_timezone(&Local));

        if let Err(e) = self.notifier.send(&message).await {
            tracing::error!(error = %format!("{:#}", e), "digest delivery failed");
            return Err(e).context("Failed to deliver digest");
        }

        Ok(DigestReport {
            repositories: repositories.len(),
            ai_articles: ai_articles.len(),
            economy_articles: economy_articles.len(),
            summary,
            message,
        })
    }
}
