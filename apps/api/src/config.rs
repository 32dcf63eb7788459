use std::str::FromStr;
use std::time::Duration;

use anyhow::{anyhow, bail, Context, Result};

/// Which generative-AI backend serves optimization and cover letters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AiProvider {
    OpenAi,
    Gemini,
}

impl FromStr for AiProvider {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "openai" => Ok(AiProvider::OpenAi),
            "gemini" => Ok(AiProvider::Gemini),
            other => Err(anyhow!("AI_PROVIDER must be 'openai' or 'gemini', got '{other}'")),
        }
    }
}

/// What an AI service does when the provider call fails.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FailurePolicy {
    /// Surface the failure to the caller as a 500.
    #[default]
    Fail,
    /// Log it and return fallback content built from the resume itself.
    Degrade,
}

impl FromStr for FailurePolicy {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "fail" => Ok(FailurePolicy::Fail),
            "degrade" => Ok(FailurePolicy::Degrade),
            other => Err(anyhow!("AI_FAILURE_MODE must be 'fail' or 'degrade', got '{other}'")),
        }
    }
}

/// Application configuration loaded from environment variables.
/// Startup aborts if required variables are missing.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub jwt_secret: String,
    pub ai_provider: AiProvider,
    pub openai_api_key: Option<String>,
    pub openai_model: String,
    pub openai_base_url: String,
    pub google_api_key: Option<String>,
    pub gemini_model: String,
    pub ai_timeout: Duration,
    pub failure_policy: FailurePolicy,
    pub chrome_bin: String,
    pub pdf_timeout: Duration,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from any key lookup. `from_env` passes the process environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());
        let required = |key: &str| {
            lookup(key)
                .filter(|v| !v.is_empty())
                .with_context(|| format!("Required environment variable '{key}' is not set"))
        };

        let ai_provider: AiProvider = var("AI_PROVIDER", "openai").parse()?;
        let openai_api_key = lookup("OPENAI_API_KEY").filter(|v| !v.is_empty());
        let google_api_key = lookup("GOOGLE_API_KEY").filter(|v| !v.is_empty());

        match ai_provider {
            AiProvider::OpenAi if openai_api_key.is_none() => {
                bail!("OPENAI_API_KEY is required when AI_PROVIDER=openai")
            }
            AiProvider::Gemini if google_api_key.is_none() => {
                bail!("GOOGLE_API_KEY is required when AI_PROVIDER=gemini")
            }
            _ => {}
        }

        Ok(Config {
            database_url: required("DATABASE_URL")?,
            jwt_secret: required("AUTH_JWT_SECRET")?,
            ai_provider,
            openai_api_key,
            openai_model: var("OPENAI_MODEL", crate::llm_client::openai::DEFAULT_MODEL),
            openai_base_url: var("OPENAI_BASE_URL", crate::llm_client::openai::DEFAULT_BASE_URL),
            google_api_key,
            gemini_model: var("GEMINI_MODEL", crate::llm_client::gemini::DEFAULT_MODEL),
            ai_timeout: Duration::from_secs(
                var("AI_TIMEOUT_SECS", "60")
                    .parse()
                    .context("AI_TIMEOUT_SECS must be a whole number of seconds")?,
            ),
            failure_policy: var("AI_FAILURE_MODE", "fail").parse()?,
            chrome_bin: var("CHROME_BIN", "chromium"),
            pdf_timeout: Duration::from_secs(
                var("PDF_TIMEOUT_SECS", "30")
                    .parse()
                    .context("PDF_TIMEOUT_SECS must be a whole number of seconds")?,
            ),
            port: var("PORT", "8080")
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: var("RUST_LOG", "info"),
        })
    }
}
