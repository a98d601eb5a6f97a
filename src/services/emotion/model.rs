//! Hosted language model client.
//!
//! One `HostedModelClient` is built at start-up and shared; the underlying
//! `reqwest::Client` carries the configured timeout and connection pool.

use std::time::Duration;

use async_trait::async_trait;
use serde_json::{json, Value};

use crate::config::{AiConfig, ModelProvider};
use crate::services::emotion::AiError;

const ANTHROPIC_VERSION: &str = "2023-06-01";
const MAX_TOKENS: u32 = 1024;

/// A text-in, text-out completion endpoint.
#[async_trait]
pub trait LanguageModel: Send + Sync {
    async fn complete(&self, prompt: &str) -> Result<String, AiError>;
}

#[derive(Debug, Clone)]
pub struct HostedModelClient {
    http: reqwest::Client,
    provider: ModelProvider,
    api_key: String,
    model: String,
    base_url: String,
}

impl HostedModelClient {
    /// Returns `Ok(None)` when no API key is configured.
    pub fn from_config(config: &AiConfig) -> Result<Option<Self>, AiError> {
        let Some(api_key) = config.api_key.clone() else {
            return Ok(None);
        };

        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Some(Self {
            http,
            provider: config.provider,
            api_key,
            model: config.model.clone(),
            base_url: config
                .base_url
                .clone()
                .unwrap_or_else(|| config.provider.default_base_url().to_string())
                .trim_end_matches('/')
                .to_string(),
        }))
    }

    async fn post(&self, request: reqwest::RequestBuilder, body: Value) -> Result<Value, AiError> {
        let response = request.json(&body).send().await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(AiError::Upstream { status, body });
        }

        Ok(response.json::<Value>().await?)
    }

    async fn complete_anthropic(&self, prompt: &str) -> Result<String, AiError> {
        let request = self
            .http
            .post(format!("{}/v1/messages", self.base_url))
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", ANTHROPIC_VERSION);

        let reply = self
            .post(
                request,
                json!({
                    "model": self.model,
                    "max_tokens": MAX_TOKENS,
                    "messages": [{
                        "role": "user",
                        "content": prompt
                    }]
                }),
            )
            .await?;

        parse_anthropic_reply(&reply)
    }

    async fn complete_gemini(&self, prompt: &str) -> Result<String, AiError> {
        let request = self
            .http
            .post(format!(
                "{}/v1beta/models/{}:generateContent",
                self.base_url, self.model
            ))
            .header("x-goog-api-key", &self.api_key);

        let reply = self
            .post(
                request,
                json!({
                    "contents": [
                        { "parts": [ { "text": prompt } ] }
                    ]
                }),
            )
            .await?;

        parse_gemini_reply(&reply)
    }
}

#[async_trait]
impl LanguageModel for HostedModelClient {
    async fn complete(&self, prompt: &str) -> Result<String, AiError> {
        tracing::debug!(provider = ?self.provider, model = %self.model, "Requesting completion");
        match self.provider {
            ModelProvider::Anthropic => self.complete_anthropic(prompt).await,
            ModelProvider::Gemini => self.complete_gemini(prompt).await,
        }
    }
}

pub fn parse_anthropic_reply(reply: &Value) -> Result<String, AiError> {
    reply
        .pointer("/content/0/text")
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or_else(|| AiError::MalformedReply("missing content[0].text".into()))
}

pub fn parse_gemini_reply(reply: &Value) -> Result<String, AiError> {
    let parts = reply
        .pointer("/candidates/0/content/parts")
        .and_then(Value::as_array)
        .ok_or_else(|| AiError::MalformedReply("missing candidates[0].content.parts".into()))?;

    let text: String = parts
        .iter()
        .filter_map(|p| p.get("text").and_then(Value::as_str))
        .collect();

    if text.is_empty() {
        return Err(AiError::MalformedReply("empty candidate text".into()));
    }
    Ok(text)
}
