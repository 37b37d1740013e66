//! Fallback chain driver.
//!
//! Tries an ordered list of remote providers and stops at the first success;
//! when every remote attempt fails, degrades to the local pattern router
//! with a short diagnostic prefix derived from the first provider's failure
//! class. The contract guarantees a string result under all conditions — a
//! provider error is never surfaced as a hard failure.

use crate::chatbot::PatternRouter;
use crate::context::SessionContext;
use crate::llms::provider::RemoteProvider;
use crate::llms::providers::{GeminiProvider, OpenAiProvider};

/// Top-level response strategy: remote providers in order, then local.
#[derive(Debug)]
pub struct Responder {
    providers: Vec<Box<dyn RemoteProvider>>,
    router: PatternRouter,
}

impl Default for Responder {
    fn default() -> Self {
        Self::new()
    }
}

impl Responder {
    /// Default chain: Gemini first (better latency), then OpenAI, then the
    /// local knowledge base.
    pub fn new() -> Self {
        Self::with_providers(vec![
            Box::new(GeminiProvider::new()),
            Box::new(OpenAiProvider::new()),
        ])
    }

    pub fn with_providers(providers: Vec<Box<dyn RemoteProvider>>) -> Self {
        Self {
            providers,
            router: PatternRouter::new(),
        }
    }

    /// Order the chain for a model selector.
    ///
    /// A selector naming a provider (substring match, case-insensitive, so
    /// "ChatGPT (OpenAI)" selects OpenAI) moves it to the front; the
    /// remaining providers keep their configured order. No selector keeps
    /// the default order.
    fn chain_for(&self, selector: Option<&str>) -> Vec<&dyn RemoteProvider> {
        let mut chain: Vec<&dyn RemoteProvider> =
            self.providers.iter().map(|p| p.as_ref()).collect();

        if let Some(selector) = selector {
            let selector = selector.to_lowercase();
            // "chatgpt" is a common alias for the OpenAI provider.
            let named = |p: &&dyn RemoteProvider| {
                let name = p.name().to_lowercase();
                selector.contains(&name) || (name == "openai" && selector.contains("chatgpt"))
            };
            if let Some(pos) = chain.iter().position(named) {
                let front = chain.remove(pos);
                chain.insert(0, front);
            }
        }

        chain
    }

    /// Produce a response, degrading gracefully to the local router.
    pub async fn respond(
        &self,
        selector: Option<&str>,
        query: &str,
        ctx: &SessionContext,
    ) -> String {
        let mut first_failure = None;

        for provider in self.chain_for(selector) {
            match provider.attempt(query, ctx).await {
                Ok(text) => return text,
                Err(failure) => {
                    log::warn!(
                        "provider {} failed ({:?}): {}",
                        provider.name(),
                        failure.kind,
                        failure.message
                    );
                    first_failure.get_or_insert(failure);
                }
            }
        }

        let local = self.router.respond(query, ctx);
        match first_failure {
            Some(failure) => format!("{}{}", failure.diagnostic_prefix(), local),
            None => local,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chatbot::knowledge;
    use crate::llms::provider::{FailureKind, ProviderFailure};
    use async_trait::async_trait;

    #[derive(Debug)]
    struct MockProvider {
        name: &'static str,
        outcome: Result<&'static str, (FailureKind, &'static str)>,
    }

    #[async_trait]
    impl RemoteProvider for MockProvider {
        fn name(&self) -> &str {
            self.name
        }

        async fn attempt(
            &self,
            _query: &str,
            _ctx: &SessionContext,
        ) -> Result<String, ProviderFailure> {
            match self.outcome {
                Ok(text) => Ok(text.to_string()),
                Err((kind, message)) => Err(ProviderFailure {
                    provider: self.name.to_string(),
                    kind,
                    message: message.to_string(),
                }),
            }
        }
    }

    fn ok(name: &'static str, text: &'static str) -> Box<dyn RemoteProvider> {
        Box::new(MockProvider {
            name,
            outcome: Ok(text),
        })
    }

    fn failing(name: &'static str, kind: FailureKind) -> Box<dyn RemoteProvider> {
        Box::new(MockProvider {
            name,
            outcome: Err((kind, "boom")),
        })
    }

    #[tokio::test]
    async fn first_success_stops_the_chain() {
        let responder =
            Responder::with_providers(vec![ok("Gemini", "from gemini"), ok("OpenAI", "from openai")]);
        let out = responder
            .respond(None, "what is vqe?", &SessionContext::default())
            .await;
        assert_eq!(out, "from gemini");
    }

    #[tokio::test]
    async fn selector_moves_named_provider_to_front() {
        let responder =
            Responder::with_providers(vec![ok("Gemini", "from gemini"), ok("OpenAI", "from openai")]);
        let out = responder
            .respond(
                Some("ChatGPT (OpenAI)"),
                "what is vqe?",
                &SessionContext::default(),
            )
            .await;
        assert_eq!(out, "from openai");
    }

    #[tokio::test]
    async fn named_provider_failure_falls_through_to_the_other() {
        let responder = Responder::with_providers(vec![
            failing("Gemini", FailureKind::Other),
            ok("OpenAI", "from openai"),
        ]);
        let out = responder
            .respond(Some("Gemini (Google)"), "hello", &SessionContext::default())
            .await;
        assert_eq!(out, "from openai");
    }

    #[tokio::test]
    async fn total_failure_prefixes_first_providers_quota_diagnostic() {
        let responder = Responder::with_providers(vec![
            failing("Gemini", FailureKind::Quota),
            failing("OpenAI", FailureKind::Other),
        ]);
        let out = responder
            .respond(None, "what is vqe?", &SessionContext::default())
            .await;
        assert!(out.starts_with("Gemini API quota exceeded. "));
        assert!(out.contains("Variational Quantum Eigensolver"));
        assert!(!out.contains("API error ("));
    }

    #[tokio::test]
    async fn config_failure_gets_config_diagnostic() {
        let responder = Responder::with_providers(vec![failing("Gemini", FailureKind::Config)]);
        let out = responder
            .respond(None, "hello", &SessionContext::default())
            .await;
        assert!(out.starts_with("Gemini API configuration error"));
        assert!(out.contains(knowledge::GREETING));
    }

    #[tokio::test]
    async fn no_providers_means_plain_local_answer() {
        let responder = Responder::with_providers(vec![]);
        let out = responder
            .respond(None, "what is vqe?", &SessionContext::default())
            .await;
        assert_eq!(out, knowledge::VQE_WHAT);
    }
}
