//! Provider abstraction and failure taxonomy.

use std::fmt;

use async_trait::async_trait;
use thiserror::Error;

use crate::context::SessionContext;

/// Failure classes, detected by substring inspection of the underlying
/// error text. Drives the diagnostic prefix attached to degraded answers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// Rate limit or quota exhaustion.
    Quota,
    /// Missing credential or rejected configuration.
    Config,
    /// Anything else: network, parse, server-side.
    Other,
}

impl FailureKind {
    /// Classify an error message.
    pub fn classify(message: &str) -> Self {
        let lower = message.to_lowercase();
        if lower.contains("quota") || lower.contains("429") || lower.contains("rate limit") {
            Self::Quota
        } else if lower.contains("400")
            || lower.contains("api key")
            || lower.contains("not configured")
            || lower.contains("unauthorized")
            || lower.contains("401")
        {
            Self::Config
        } else {
            Self::Other
        }
    }
}

/// A classified provider failure. Never surfaced raw to the end user; the
/// responder converts it into a short diagnostic prefix.
#[derive(Debug, Clone, Error)]
#[error("{provider} provider failure ({kind:?}): {message}")]
pub struct ProviderFailure {
    pub provider: String,
    pub kind: FailureKind,
    pub message: String,
}

impl ProviderFailure {
    pub fn new(provider: impl Into<String>, message: impl Into<String>) -> Self {
        let message = message.into();
        Self {
            provider: provider.into(),
            kind: FailureKind::classify(&message),
            message,
        }
    }

    pub fn config(provider: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            provider: provider.into(),
            kind: FailureKind::Config,
            message: message.into(),
        }
    }

    /// Human-readable prefix for the degraded local answer.
    pub fn diagnostic_prefix(&self) -> String {
        match self.kind {
            FailureKind::Quota => format!("{} API quota exceeded. ", self.provider),
            FailureKind::Config => format!(
                "{} API configuration error (check key permissions). ",
                self.provider
            ),
            FailureKind::Other => {
                let head: String = self.message.chars().take(100).collect();
                format!("API error ({}). ", head)
            }
        }
    }
}

/// One remote text-generation capability in the fallback chain.
#[async_trait]
pub trait RemoteProvider: Send + Sync + fmt::Debug {
    /// Short display name used in selectors and diagnostics.
    fn name(&self) -> &str;

    /// Attempt to answer the query with the session context embedded in the
    /// provider's instructional preamble.
    async fn attempt(
        &self,
        query: &str,
        ctx: &SessionContext,
    ) -> Result<String, ProviderFailure>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quota_errors_are_classified_by_substring() {
        assert_eq!(FailureKind::classify("Resource quota exceeded"), FailureKind::Quota);
        assert_eq!(FailureKind::classify("HTTP 429 Too Many Requests"), FailureKind::Quota);
    }

    #[test]
    fn config_errors_are_classified_by_substring() {
        assert_eq!(FailureKind::classify("status 400 bad request"), FailureKind::Config);
        assert_eq!(FailureKind::classify("API key not set"), FailureKind::Config);
    }

    #[test]
    fn everything_else_is_generic() {
        assert_eq!(FailureKind::classify("connection reset by peer"), FailureKind::Other);
    }

    #[test]
    fn generic_prefix_truncates_long_messages() {
        let long = "x".repeat(300);
        let failure = ProviderFailure {
            provider: "Gemini".to_string(),
            kind: FailureKind::Other,
            message: long,
        };
        let prefix = failure.diagnostic_prefix();
        assert!(prefix.len() < 130);
        assert!(prefix.starts_with("API error ("));
    }

    #[test]
    fn quota_prefix_names_the_provider() {
        let failure = ProviderFailure::new("Gemini", "quota exceeded for project");
        assert_eq!(failure.diagnostic_prefix(), "Gemini API quota exceeded. ");
    }
}
