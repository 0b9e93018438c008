//! Provider clients.
//!
//! # Design Decisions
//! - One `reqwest::Client` per generator, built with the configured timeout
//! - The endpoint can be overridden so tests and proxies can stand in for
//!   the real provider
//! - Provider error bodies (`{"error": {"message": ...}}`) become
//!   `AiError::Provider` with the provider's message

use async_trait::async_trait;
use serde_json::{json, Value};
use std::time::Duration;

use crate::ai::prompt::{parse_content, user_message, SYSTEM_INSTRUCTION};
use crate::ai::types::{AiError, GeneratedContent, PageSubject};
use crate::config::{AiConfig, AiProvider};

pub const OPENAI_URL: &str = "https://api.openai.com/v1/chat/completions";
pub const OPENAI_MODEL: &str = "gpt-4o-mini";
pub const ANTHROPIC_URL: &str = "https://api.anthropic.com/v1/messages";
pub const ANTHROPIC_MODEL: &str = "claude-3-5-sonnet-20241022";
pub const ANTHROPIC_VERSION: &str = "2023-06-01";

const MAX_TOKENS: u32 = 500;

/// Produces page copy for one row.
#[async_trait]
pub trait ContentGenerator: Send + Sync {
    async fn generate(&self, subject: &PageSubject) -> Result<GeneratedContent, AiError>;
}

/// Generator backed by the configured HTTP provider.
#[derive(Debug, Clone)]
pub struct HttpContentGenerator {
    client: reqwest::Client,
    config: AiConfig,
}

impl HttpContentGenerator {
    pub fn new(config: AiConfig) -> Result<Self, AiError> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("localseo-router/", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;
        Ok(Self { client, config })
    }

    fn endpoint(&self) -> &str {
        match (&self.config.endpoint, self.config.provider) {
            (Some(endpoint), _) => endpoint.as_str(),
            (None, AiProvider::OpenAi) => OPENAI_URL,
            (None, AiProvider::Anthropic) => ANTHROPIC_URL,
        }
    }

    fn request(&self, subject: &PageSubject) -> reqwest::RequestBuilder {
        let message = user_message(&self.config.prompt_template, subject);
        let builder = self.client.post(self.endpoint());

        match self.config.provider {
            AiProvider::OpenAi => builder.bearer_auth(&self.config.api_key).json(&json!({
                "model": OPENAI_MODEL,
                "messages": [
                    { "role": "system", "content": SYSTEM_INSTRUCTION },
                    { "role": "user", "content": message },
                ],
                "temperature": 0.7,
                "max_tokens": MAX_TOKENS,
            })),
            AiProvider::Anthropic => builder
                .header("x-api-key", &self.config.api_key)
                .header("anthropic-version", ANTHROPIC_VERSION)
                .json(&json!({
                    "model": ANTHROPIC_MODEL,
                    "max_tokens": MAX_TOKENS,
                    "messages": [
                        { "role": "user", "content": message },
                    ],
                })),
        }
    }

    fn extract_text(&self, body: &Value) -> Option<String> {
        let text = match self.config.provider {
            AiProvider::OpenAi => body.pointer("/choices/0/message/content"),
            AiProvider::Anthropic => body.pointer("/content/0/text"),
        };
        text.and_then(Value::as_str)
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(str::to_string)
    }
}

#[async_trait]
impl ContentGenerator for HttpContentGenerator {
    async fn generate(&self, subject: &PageSubject) -> Result<GeneratedContent, AiError> {
        if self.config.api_key.trim().is_empty() {
            return Err(AiError::NotConfigured);
        }

        let response = self.request(subject).send().await?;
        let status = response.status();
        let body: Value = response.json().await?;

        if let Some(error) = body.get("error") {
            let message = error
                .get("message")
                .and_then(Value::as_str)
                .unwrap_or("Unknown error");
            return Err(AiError::Provider(message.to_string()));
        }
        if !status.is_success() {
            return Err(AiError::Provider(format!("provider returned {}", status)));
        }

        let text = self.extract_text(&body).ok_or(AiError::EmptyResponse)?;
        tracing::debug!(
            provider = ?self.config.provider,
            service = %subject.service,
            city = %subject.city,
            "AI content generated"
        );
        Ok(parse_content(&text, subject))
    }
}
