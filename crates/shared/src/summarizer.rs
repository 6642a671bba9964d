use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::ports::Completion;

pub const FALLBACK_DISCLAIMER: &str =
    "⚠️ The AI summary could not be generated today. The raw material is included below.";

/// The three formatted sections that feed a digest.
#[derive(Debug, Clone, Default)]
pub struct DigestBlocks {
    pub repositories: String,
    pub ai_news: String,
    pub economy_news: String,
}

impl DigestBlocks {
    fn sections(&self) -> [(&'static str, &str); 3] {
        [
            ("Trending AI repositories", self.repositories.as_str()),
            ("AI industry news", self.ai_news.as_str()),
            ("Economy news", self.economy_news.as_str()),
        ]
    }

    /// All three blocks with their headings, in digest order.
    pub fn concatenated(&self) -> String {
        self.sections()
            .iter()
            .map(|(heading, body)| format!("==================== {} ====================\n{}", heading, body))
            .collect::<Vec<_>>()
            .join("\n\n")
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Summary {
    Generated(String),
    Fallback { reason: String, text: String },
}

impl Summary {
    pub fn text(&self) -> &str {
        match self {
            Summary::Generated(text) => text.as_str(),
            Summary::Fallback { text, .. } => text.as_str(),
        }
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self, Summary::Fallback { .. })
    }
}

pub fn build_prompt(blocks: &DigestBlocks, language: &str) -> String {
    format!(
        r#"You are a senior AI analyst writing a daily briefing for engineers and investors.

Using ONLY the material below, write today's digest in {language}.

RULES:
1. Start with 3-5 headline takeaways across all sections
2. Then one short section per topic: trending repositories, AI industry news, economy news
3. Name the repository or outlet for every claim and keep its link
4. Stay factual and analytical; no hype, no external knowledge
5. End with a one-sentence outlook on where things are heading
6. Keep the whole digest under 600 words
7. Plain text only, no Markdown tables

Material:

{material}"#,
        language = language,
        material = blocks.concatenated()
    )
}

pub fn fallback_text(blocks: &DigestBlocks) -> String {
    format!("{}\n\n{}", FALLBACK_DISCLAIMER, blocks.concatenated())
}

/// Turns the digest material into the final email text.
pub struct Summarizer {
    completion: Option<Box<dyn Completion>>,
    language: String,
}

impl Summarizer {
    pub fn new(completion: Option<Box<dyn Completion>>, language: impl Into<String>) -> Self {
        Self {
            completion,
            language: language.into(),
        }
    }

    /// Never fails: without a completion backend, or when the call errors,
    /// the raw blocks are returned behind a disclaimer.
    pub async fn summarize(&self, blocks: &DigestBlocks) -> Summary {
        let Some(completion) = &self.completion else {
            tracing::warn!("no completion API key configured, sending raw material");
            return Summary::Fallback {
                reason: "no completion API key configured".to_string(),
                text: fallback_text(blocks),
            };
        };

        let prompt = build_prompt(blocks, &self.language);
        match completion.complete(&prompt).await {
            Ok(text) if !text.trim().is_empty() => Summary::Generated(text.trim().to_string()),
            Ok(_) => {
                tracing::warn!("completion API returned an empty digest, sending raw material");
                Summary::Fallback {
                    reason: "empty completion".to_string(),
                    text: fallback_text(blocks),
                }
            }
            Err(e) => {
                tracing::warn!(error = %format!("{:#}", e), "summarization failed, sending raw material");
                Summary::Fallback {
                    reason: format!("{:#}", e),
                    text: fallback_text(blocks),
                }
            }
        }
    }
}

#[derive(Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<Message>,
    temperature: f32,
}

#[derive(Serialize, Deserialize)]
struct Message {
    role: String,
    content: String,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Deserialize)]
struct ResponseMessage {
    #[serde(default)]
    content: Option<String>,
}

/// Client for OpenAI-compatible `chat/completions` endpoints (Zhipu GLM by default).
pub struct ChatCompletionClient {
    client: Client,
    api_key: String,
    model: String,
    base_url: Url,
}

impl ChatCompletionClient {
    pub fn new(api_key: String, model: String, base_url: Url) -> Result<Self> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(60))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            api_key,
            model,
            base_url,
        })
    }
}

#[async_trait]
impl Completion for ChatCompletionClient {
    async fn complete(&self, prompt: &str) -> Result<String> {
        let url = self
            .base_url
            .join("chat/completions")
            .context("Invalid completion API base URL")?;

        let request = ChatRequest {
            model: self.model.clone(),
            messages: vec![Message {
                role: "user".to_string(),
                content: prompt.to_string(),
            }],
            temperature: 0.4,
        };

        let response = self
            .client
            .post(url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("content-type", "application/json")
            .json(&request)
            .send()
            .await
            .context("Failed to send request to completion API")?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| String::from("unknown error"));
            anyhow::bail!("Completion API error: {} - {}", status, error_text);
        }

        let chat_response = response
            .json::<ChatResponse>()
            .await
            .context("Failed to parse completion API response")?;

        Ok(chat_response
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .unwrap_or_default())
    }
}
