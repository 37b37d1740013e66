//! Google Gemini completion provider.
//!
//! Direct integration with the Generative Language API. The session context
//! goes into `systemInstruction`; on a failed call with the primary model
//! the provider retries once against a known-good fallback model before
//! reporting the original failure.
//!
//! # Authentication
//!
//! Uses `GEMINI_API_KEY` or `GOOGLE_API_KEY` from the environment unless a
//! key is passed to the constructor.

use async_trait::async_trait;
use serde_json::Value;

use crate::context::SessionContext;
use crate::llms::prompts::system_prompt;
use crate::llms::provider::{ProviderFailure, RemoteProvider};

/// Default model for dashboard chat.
const DEFAULT_MODEL: &str = "gemini-2.5-flash";

/// Known-good model tried once when the primary model fails.
const FALLBACK_MODEL: &str = "gemini-flash-latest";

/// Client-side request timeout in seconds.
const REQUEST_TIMEOUT_SECS: f64 = 30.0;

/// Google Gemini completion provider.
#[derive(Debug, Clone)]
pub struct GeminiProvider {
    pub model: String,
    api_key: Option<String>,
    base_url: Option<String>,
}

impl GeminiProvider {
    /// Create a provider with the default model, reading the key from the
    /// environment.
    pub fn new() -> Self {
        Self::with_model(DEFAULT_MODEL, None)
    }

    pub fn with_model(model: impl Into<String>, api_key: Option<String>) -> Self {
        let api_key = api_key
            .or_else(|| std::env::var("GEMINI_API_KEY").ok())
            .or_else(|| std::env::var("GOOGLE_API_KEY").ok());
        Self {
            model: model.into(),
            api_key,
            base_url: None,
        }
    }

    /// Override the API base URL (tests, proxies).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    fn endpoint(&self, model: &str) -> String {
        let base = self
            .base_url
            .as_deref()
            .unwrap_or("https://generativelanguage.googleapis.com/v1beta");
        format!("{}/models/{}:generateContent", base, model)
    }

    fn build_request_body(&self, query: &str, ctx: &SessionContext) -> Value {
        serde_json::json!({
            "systemInstruction": {
                "parts": [{ "text": system_prompt(ctx) }]
            },
            "contents": [
                { "role": "user", "parts": [{ "text": query }] }
            ],
        })
    }

    async fn call_model(
        &self,
        model: &str,
        api_key: &str,
        body: &Value,
    ) -> Result<String, ProviderFailure> {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs_f64(REQUEST_TIMEOUT_SECS))
            .build()
            .map_err(|e| ProviderFailure::new(self.name(), e.to_string()))?;

        let response = client
            .post(self.endpoint(model))
            .header("x-goog-api-key", api_key)
            .json(body)
            .send()
            .await
            .map_err(|e| ProviderFailure::new(self.name(), e.to_string()))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| ProviderFailure::new(self.name(), e.to_string()))?;

        if !status.is_success() {
            return Err(ProviderFailure::new(
                self.name(),
                format!("Gemini API error ({}): {}", status, text),
            ));
        }

        let json: Value = serde_json::from_str(&text).map_err(|e| {
            ProviderFailure::new(self.name(), format!("Failed to parse Gemini response: {}", e))
        })?;

        let content = json
            .get("candidates")
            .and_then(|c| c.get(0))
            .and_then(|c| c.get("content"))
            .and_then(|c| c.get("parts"))
            .and_then(|p| p.get(0))
            .and_then(|p| p.get("text"))
            .and_then(|t| t.as_str())
            .ok_or_else(|| {
                ProviderFailure::new(self.name(), "No candidate text in Gemini response")
            })?;

        Ok(content.to_string())
    }
}

impl Default for GeminiProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RemoteProvider for GeminiProvider {
    fn name(&self) -> &str {
        "Gemini"
    }

    async fn attempt(
        &self,
        query: &str,
        ctx: &SessionContext,
    ) -> Result<String, ProviderFailure> {
        let api_key = self.api_key.clone().ok_or_else(|| {
            ProviderFailure::config(
                self.name(),
                "Gemini API key not set. Set GEMINI_API_KEY or GOOGLE_API_KEY in the environment.",
            )
        })?;

        log::debug!("GeminiProvider.attempt: model={}", self.model);

        let body = self.build_request_body(query, ctx);
        let primary = self.call_model(&self.model, &api_key, &body).await;

        match primary {
            Ok(text) => Ok(text),
            Err(err) if self.model != FALLBACK_MODEL => {
                log::warn!(
                    "Gemini model {} failed ({}); retrying with {}",
                    self.model,
                    err.message,
                    FALLBACK_MODEL
                );
                match self.call_model(FALLBACK_MODEL, &api_key, &body).await {
                    Ok(text) => Ok(text),
                    // Report the primary failure; the fallback is best-effort.
                    Err(_) => Err(err),
                }
            }
            Err(err) => Err(err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llms::provider::FailureKind;
    use axum::extract::Path;
    use axum::http::StatusCode;
    use axum::response::IntoResponse;
    use axum::routing::post;
    use axum::Router;

    async fn spawn_mock(router: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        format!("http://{}", addr)
    }

    fn candidate_body(text: &str) -> axum::Json<Value> {
        axum::Json(serde_json::json!({
            "candidates": [{ "content": { "parts": [{ "text": text }] } }]
        }))
    }

    #[tokio::test]
    async fn missing_key_fails_closed_with_config_error() {
        let provider = GeminiProvider {
            model: DEFAULT_MODEL.to_string(),
            api_key: None,
            base_url: None,
        };
        let err = provider
            .attempt("hi", &SessionContext::default())
            .await
            .unwrap_err();
        assert_eq!(err.kind, FailureKind::Config);
    }

    #[test]
    fn request_body_uses_system_instruction() {
        let provider = GeminiProvider::with_model(DEFAULT_MODEL, Some("k".to_string()));
        let ctx = SessionContext {
            vqe_results: Some("final_energy: -4.8".to_string()),
            ..Default::default()
        };
        let body = provider.build_request_body("explain my results", &ctx);
        assert!(body["systemInstruction"]["parts"][0]["text"]
            .as_str()
            .unwrap()
            .contains("final_energy: -4.8"));
        assert_eq!(body["contents"][0]["role"], "user");
    }

    #[tokio::test]
    async fn failed_primary_model_falls_back_once() {
        let router = Router::new().route(
            "/models/{call}",
            post(|Path(call): Path<String>| async move {
                if call.starts_with(FALLBACK_MODEL) {
                    candidate_body("from fallback").into_response()
                } else {
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        format!("no such model {}", call),
                    )
                        .into_response()
                }
            }),
        );
        let base = spawn_mock(router).await;

        let provider = GeminiProvider::with_model(DEFAULT_MODEL, Some("k".to_string()))
            .with_base_url(base);
        let out = provider
            .attempt("hi", &SessionContext::default())
            .await
            .unwrap();
        assert_eq!(out, "from fallback");
    }

    #[tokio::test]
    async fn total_model_failure_reports_the_primary_error() {
        let router = Router::new().route(
            "/models/{call}",
            post(|Path(call): Path<String>| async move {
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    format!("no such model {}", call),
                )
            }),
        );
        let base = spawn_mock(router).await;

        let provider = GeminiProvider::with_model(DEFAULT_MODEL, Some("k".to_string()))
            .with_base_url(base);
        let err = provider
            .attempt("hi", &SessionContext::default())
            .await
            .unwrap_err();
        assert!(err.message.contains(DEFAULT_MODEL));
        assert!(!err.message.contains(FALLBACK_MODEL));
    }

    #[test]
    fn endpoint_targets_the_requested_model() {
        let provider = GeminiProvider::with_model("gemini-2.5-flash", Some("k".to_string()));
        assert!(provider
            .endpoint("gemini-flash-latest")
            .ends_with("models/gemini-flash-latest:generateContent"));
    }
}
