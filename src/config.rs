use std::env;
use std::path::PathBuf;
use std::str::FromStr;

use anyhow::{bail, Context};

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub frontend_url: String,
    pub cors_extra_origins: Vec<String>,

    pub data_dir: PathBuf,

    pub ai: AiConfig,
    pub remote_store: Option<RemoteStoreConfig>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModelProvider {
    Gemini,
    Anthropic,
}

impl ModelProvider {
    pub fn default_model(&self) -> &'static str {
        match self {
            ModelProvider::Gemini => "gemini-1.5-flash",
            ModelProvider::Anthropic => "claude-sonnet-4-20250514",
        }
    }

    pub fn default_base_url(&self) -> &'static str {
        match self {
            ModelProvider::Gemini => "https://generativelanguage.googleapis.com",
            ModelProvider::Anthropic => "https://api.anthropic.com",
        }
    }

    /// Provider-specific variable consulted when `EMOTION_AI_API_KEY` is unset.
    fn key_var(&self) -> &'static str {
        match self {
            ModelProvider::Gemini => "GOOGLE_GENERATIVE_AI_API_KEY",
            ModelProvider::Anthropic => "CLAUDE_API_KEY",
        }
    }
}

impl FromStr for ModelProvider {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "gemini" | "google" => Ok(Self::Gemini),
            "anthropic" | "claude" => Ok(Self::Anthropic),
            other => bail!("unknown EMOTION_AI_PROVIDER: {other}"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AiConfig {
    /// Absent key disables the AI tier.
    pub api_key: Option<String>,
    pub provider: ModelProvider,
    pub model: String,
    pub base_url: Option<String>,
    pub timeout_secs: u64,
}

impl Default for AiConfig {
    fn default() -> Self {
        let provider = ModelProvider::Gemini;
        Self {
            api_key: None,
            provider,
            model: provider.default_model().to_string(),
            base_url: None,
            timeout_secs: 30,
        }
    }
}

#[derive(Debug, Clone)]
pub struct RemoteStoreConfig {
    pub database_url: String,
    pub max_connections: u32,
    pub acquire_timeout_secs: u64,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the config from any key lookup. Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let provider: ModelProvider = match get("EMOTION_AI_PROVIDER") {
            Some(p) => p.parse()?,
            None => ModelProvider::Gemini,
        };

        let ai = AiConfig {
            api_key: get("EMOTION_AI_API_KEY").or_else(|| get(provider.key_var())),
            provider,
            model: get("EMOTION_AI_MODEL").unwrap_or_else(|| provider.default_model().into()),
            base_url: get("EMOTION_AI_BASE_URL"),
            timeout_secs: parse_or(get("EMOTION_AI_TIMEOUT_SECS"), 30, "EMOTION_AI_TIMEOUT_SECS")?,
        };

        let remote_store = match get("DATABASE_URL") {
            Some(database_url) => Some(RemoteStoreConfig {
                database_url,
                max_connections: parse_or(
                    get("DATABASE_MAX_CONNECTIONS"),
                    10,
                    "DATABASE_MAX_CONNECTIONS",
                )?,
                acquire_timeout_secs: 5,
            }),
            None => None,
        };

        Ok(Self {
            host: get("HOST").unwrap_or_else(|| "0.0.0.0".into()),
            port: parse_or(get("PORT"), 8080, "PORT")?,
            frontend_url: get("FRONTEND_URL").unwrap_or_else(|| "http://localhost:3000".into()),
            cors_extra_origins: get("CORS_EXTRA_ORIGINS")
                .map(|v| {
                    v.split(',')
                        .map(|o| o.trim().to_string())
                        .filter(|o| !o.is_empty())
                        .collect()
                })
                .unwrap_or_default(),
            data_dir: get("DATA_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("./data")),
            ai,
            remote_store,
        })
    }

    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn parse_or<T>(value: Option<String>, default: T, key: &str) -> anyhow::Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match value {
        Some(v) => v
            .trim()
            .parse()
            .with_context(|| format!("{key} must be a number")),
        None => Ok(default),
    }
}
