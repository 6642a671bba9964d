// Public modules
pub mod collector;
pub mod config;
pub mod formatter;
pub mod github;
pub mod mailer;
pub mod merge;
pub mod models;
pub mod newsapi;
pub mod pipeline;
pub mod ports;
pub mod summarizer;

// Re-export commonly used types
pub use collector::Collector;
pub use config::{Config, ConfigError};
pub use github::GitHubClient;
pub use mailer::{ConsoleNotifier, DigestMessage, SmtpNotifier};
pub use merge::{merge_repositories, MAX_MERGED_REPOSITORIES};
pub use models::{ArticleRecord, NewsQuery, RepoQuery, RepositoryRecord};
pub use newsapi::NewsApiClient;
pub use pipeline::{DigestPipeline, DigestPlan, DigestReport};
pub use ports::{Completion, NewsSearch, Notifier, RepoSearch};
pub use summarizer::{ChatCompletionClient, DigestBlocks, Summarizer, Summary};
