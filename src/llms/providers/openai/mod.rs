//! OpenAI chat completion provider.
//!
//! Direct integration with the Chat Completions API via `reqwest`. The
//! session context is embedded as the system message; the user query is sent
//! as-is. Fails closed with a configuration-class failure when no API key is
//! available.
//!
//! # Authentication
//!
//! Uses the `OPENAI_API_KEY` environment variable unless a key is passed to
//! the constructor.

use async_trait::async_trait;
use serde_json::Value;

use crate::context::SessionContext;
use crate::llms::prompts::system_prompt;
use crate::llms::provider::{ProviderFailure, RemoteProvider};

/// Default model for dashboard chat.
const DEFAULT_MODEL: &str = "gpt-3.5-turbo";

/// Client-side request timeout in seconds.
const REQUEST_TIMEOUT_SECS: f64 = 30.0;

/// OpenAI chat completion provider.
#[derive(Debug, Clone)]
pub struct OpenAiProvider {
    pub model: String,
    api_key: Option<String>,
    base_url: Option<String>,
    pub temperature: f64,
    pub max_tokens: u32,
}

impl OpenAiProvider {
    /// Create a provider with the default model, reading the key from the
    /// environment.
    pub fn new() -> Self {
        Self::with_model(DEFAULT_MODEL, None)
    }

    pub fn with_model(model: impl Into<String>, api_key: Option<String>) -> Self {
        Self {
            model: model.into(),
            api_key: api_key.or_else(|| std::env::var("OPENAI_API_KEY").ok()),
            base_url: None,
            temperature: 0.7,
            max_tokens: 500,
        }
    }

    /// Override the API base URL (tests, proxies).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    fn endpoint(&self) -> String {
        let base = self
            .base_url
            .as_deref()
            .unwrap_or("https://api.openai.com/v1");
        format!("{}/chat/completions", base)
    }

    fn build_request_body(&self, query: &str, ctx: &SessionContext) -> Value {
        serde_json::json!({
            "model": self.model,
            "messages": [
                { "role": "system", "content": system_prompt(ctx) },
                { "role": "user", "content": query },
            ],
            "temperature": self.temperature,
            "max_tokens": self.max_tokens,
        })
    }
}

impl Default for OpenAiProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RemoteProvider for OpenAiProvider {
    fn name(&self) -> &str {
        "OpenAI"
    }

    async fn attempt(
        &self,
        query: &str,
        ctx: &SessionContext,
    ) -> Result<String, ProviderFailure> {
        let api_key = self.api_key.as_deref().ok_or_else(|| {
            ProviderFailure::config(
                self.name(),
                "OpenAI API key not set. Set OPENAI_API_KEY in the environment.",
            )
        })?;

        log::debug!("OpenAiProvider.attempt: model={}", self.model);

        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs_f64(REQUEST_TIMEOUT_SECS))
            .build()
            .map_err(|e| ProviderFailure::new(self.name(), e.to_string()))?;

        let response = client
            .post(self.endpoint())
            .header("Authorization", format!("Bearer {}", api_key))
            .json(&self.build_request_body(query, ctx))
            .send()
            .await
            .map_err(|e| ProviderFailure::new(self.name(), e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| ProviderFailure::new(self.name(), e.to_string()))?;

        if !status.is_success() {
            return Err(ProviderFailure::new(
                self.name(),
                format!("OpenAI API error ({}): {}", status, body),
            ));
        }

        let json: Value = serde_json::from_str(&body).map_err(|e| {
            ProviderFailure::new(self.name(), format!("Failed to parse OpenAI response: {}", e))
        })?;

        let content = json
            .get("choices")
            .and_then(|c| c.get(0))
            .and_then(|c| c.get("message"))
            .and_then(|m| m.get("content"))
            .and_then(|c| c.as_str())
            .ok_or_else(|| {
                ProviderFailure::new(self.name(), "No message content in OpenAI response")
            })?;

        Ok(content.to_string())
    }
}
