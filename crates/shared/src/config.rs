use std::env;

use thiserror::Error;
use url::Url;

pub const DEFAULT_SMTP_HOST: &str = "smtp.qq.com";
pub const DEFAULT_SMTP_PORT: u16 = 587;
pub const DEFAULT_LLM_MODEL: &str = "glm-4-air";
pub const DEFAULT_LLM_API_URL: &str = "https://open.bigmodel.cn/api/paas/v4/";
pub const DEFAULT_GITHUB_API_URL: &str = "https://api.github.com/";
pub const DEFAULT_NEWS_API_URL: &str = "https://newsapi.org/";
pub const DEFAULT_DIGEST_LANGUAGE: &str = "Chinese";

/// Variables that must be present before the digest run touches the network.
pub const REQUIRED_VARS: [&str; 5] = [
    "GITHUB_TOKEN",
    "NEWS_API_KEY",
    "SMTP_USER",
    "SMTP_PASS",
    "TO_EMAIL",
];

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error(
        "missing environment variables: {}.\n\n\
        Set them in the environment or in ~/.config/ai-daily-digest/.env",
        .0.join(", ")
    )]
    Missing(Vec<String>),

    #[error("invalid value for {key}: {value:?} ({reason})")]
    Invalid {
        key: String,
        value: String,
        reason: String,
    },
}

#[derive(Debug, Clone)]
pub struct SmtpSettings {
    pub host: String,
    pub port: u16,
    pub username: String,
    pub password: String,
}

#[derive(Debug, Clone)]
pub struct LlmSettings {
    /// `None` means every summary falls back to the raw material.
    pub api_key: Option<String>,
    pub model: String,
    pub api_url: Url,
    pub language: String,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub github_token: String,
    pub news_api_key: String,
    pub recipient: String,
    pub smtp: SmtpSettings,
    pub llm: LlmSettings,
    pub github_api_url: Url,
    pub news_api_url: Url,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::try_load_dotenv();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the configuration from any key lookup. Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let missing: Vec<String> = REQUIRED_VARS
            .iter()
            .filter(|&&key| get(key).is_none())
            .map(|key| key.to_string())
            .collect();
        if !missing.is_empty() {
            return Err(ConfigError::Missing(missing));
        }

        let required = |key: &str| get(key).unwrap_or_default();

        let smtp_port = match get("SMTP_PORT") {
            Some(raw) => raw.parse::<u16>().map_err(|e| ConfigError::Invalid {
                key: "SMTP_PORT".to_string(),
                value: raw.clone(),
                reason: e.to_string(),
            })?,
            None => DEFAULT_SMTP_PORT,
        };

        Ok(Self {
            github_token: required("GITHUB_TOKEN"),
            news_api_key: required("NEWS_API_KEY"),
            recipient: required("TO_EMAIL"),
            smtp: SmtpSettings {
                host: get("SMTP_HOST").unwrap_or_else(|| DEFAULT_SMTP_HOST.to_string()),
                port: smtp_port,
                username: required("SMTP_USER"),
                password: required("SMTP_PASS"),
            },
            llm: LlmSettings {
                api_key: get("ZHIPU_API_KEY"),
                model: get("LLM_MODEL").unwrap_or_else(|| DEFAULT_LLM_MODEL.to_string()),
                api_url: parse_url("LLM_API_URL", get("LLM_API_URL"), DEFAULT_LLM_API_URL)?,
                language: get("DIGEST_LANGUAGE")
                    .unwrap_or_else(|| DEFAULT_DIGEST_LANGUAGE.to_string()),
            },
            github_api_url: parse_url(
                "GITHUB_API_URL",
                get("GITHUB_API_URL"),
                DEFAULT_GITHUB_API_URL,
            )?,
            news_api_url: parse_url("NEWS_API_URL", get("NEWS_API_URL"), DEFAULT_NEWS_API_URL)?,
        })
    }

    fn try_load_dotenv() {
        // Try locations in order of preference:

        // 1. Current directory (for development)
        if dotenvy::dotenv().is_ok() {
            return;
        }

        // 2. ~/.config/ai-daily-digest/.env (standard config location)
        if let Some(config_dir) = dirs::config_dir() {
            let config_path = config_dir.join("ai-daily-digest").join(".env");
            if config_path.exists() && dotenvy::from_path(&config_path).is_ok() {
                return;
            }
        }

        // 3. ~/.env (home directory)
        if let Some(home_dir) = dirs::home_dir() {
            let home_path = home_dir.join(".env");
            if home_path.exists() {
                let _ = dotenvy::from_path(&home_path);
            }
        }

        // If none found, that's okay - environment variables might be set system-wide
    }
}

/// Parses an endpoint override, normalising it to end with `/` so relative joins keep the path.
fn parse_url(key: &str, raw: Option<String>, default: &str) -> Result<Url, ConfigError> {
    let value = raw.unwrap_or_else(|| default.to_string());
    let normalised = if value.ends_with('/') {
        value.clone()
    } else {
        format!("{}/", value)
    };

    Url::parse(&normalised).map_err(|e| ConfigError::Invalid {
        key: key.to_string(),
        value,
        reason: e.to_string(),
    })
}
