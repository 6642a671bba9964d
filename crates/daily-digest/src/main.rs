use anyhow::{Context, Result};
use chrono::Utc;
use clap::Parser;
use shared::{
    ChatCompletionClient, Collector, Completion, Config, ConsoleNotifier, DigestPipeline,
    DigestPlan, GitHubClient, NewsApiClient, Notifier, SmtpNotifier, Summarizer, Summary,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "daily-digest")]
#[command(about = "Collect trending AI repositories and news, summarize them, and email the digest")]
struct Args {
    /// Print the digest instead of emailing it
    #[arg(long)]
    dry_run: bool,

    /// Skip the language-model call and send the raw material
    #[arg(long)]
    no_summary: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "daily_digest=info,shared=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args = Args::parse();

    // Nothing touches the network until the configuration is complete.
    let config = Config::from_env()?;

    let collector = Collector::new(
        Box::new(GitHubClient::new(
            config.github_token.clone(),
            config.github_api_url.clone(),
        )?),
        Box::new(NewsApiClient::new(
            config.news_api_key.clone(),
            config.news_api_url.clone(),
        )?),
    );

    let completion: Option<Box<dyn Completion>> = match (&config.llm.api_key, args.no_summary) {
        (Some(api_key), false) => Some(Box::new(ChatCompletionClient::new(
            api_key.clone(),
            config.llm.model.clone(),
            config.llm.api_url.clone(),
        )?)),
        _ => None,
    };
    let summarizer = Summarizer::new(completion, config.llm.language.clone());

    let notifier: Box<dyn Notifier> = if args.dry_run {
        Box::new(ConsoleNotifier)
    } else {
        Box::new(
            SmtpNotifier::new(&config.smtp, &config.recipient)
                .context("Failed to set up SMTP transport")?,
        )
    };

    let pipeline = DigestPipeline::new(collector, summarizer, notifier, DigestPlan::default());

    println!("🔎 Collecting repositories and news...");
    let report = pipeline.run(Utc::now()).await?;

    println!(
        "✓ {} repositories, {} AI articles, {} economy articles",
        report.repositories, report.ai_articles, report.economy_articles
    );
    if let Summary::Fallback { reason, .. } = &report.summary {
        println!("⚠ AI summary unavailable ({}), sent raw material instead", reason);
    }

    if args.dry_run {
        println!("\n✅ Dry run complete, nothing was sent.");
    } else {
        println!("\n✅ Digest sent to {}", config.recipient);
    }

    Ok(())
}
