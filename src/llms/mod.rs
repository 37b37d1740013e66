//! Remote LLM integration.
//!
//! A uniform [`provider::RemoteProvider`] trait, the concrete Gemini and
//! OpenAI implementations, the context-embedding prompt builder, and the
//! [`responder::Responder`] that drives the fallback chain down to the local
//! pattern router.

pub mod prompts;
pub mod provider;
pub mod providers;
pub mod responder;
