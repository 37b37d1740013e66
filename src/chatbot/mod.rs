//! Regex pattern router — the local knowledge base.
//!
//! Classifies free-text queries against an ordered rule list and resolves
//! the first matching rule to either a literal block or a context-formatted
//! answer. A query that matches no rule goes through a keyword-group
//! fallback and, failing that, a generic menu — the router always produces
//! exactly one response and has no mutable state of its own.

pub mod formatters;
pub mod knowledge;

use once_cell::sync::Lazy;

use crate::context::SessionContext;

pub use knowledge::{PatternRule, ResponseKind};

/// Compiled once; the rule list is immutable and shared by every router.
static RULES: Lazy<Vec<PatternRule>> = Lazy::new(knowledge::knowledge_base);

/// Priority-ordered regex dispatch over the static knowledge base.
#[derive(Debug)]
pub struct PatternRouter {
    rules: &'static [PatternRule],
}

impl Default for PatternRouter {
    fn default() -> Self {
        Self::new()
    }
}

impl PatternRouter {
    pub fn new() -> Self {
        Self { rules: &RULES }
    }

    /// Produce a response for `query` given the session context.
    ///
    /// The query is lower-cased and trimmed before matching; rules are
    /// checked in insertion order and the first regex hit wins.
    pub fn respond(&self, query: &str, ctx: &SessionContext) -> String {
        let normalized = query.trim().to_lowercase();

        for rule in self.rules {
            if rule.patterns.iter().any(|p| p.is_match(&normalized)) {
                log::debug!("pattern router matched rule '{}'", rule.name);
                return match rule.response {
                    ResponseKind::Literal(text) => text.to_string(),
                    ResponseKind::VqeResults => formatters::vqe_results_response(ctx),
                    ResponseKind::ProteinSequence => formatters::protein_sequence_response(ctx),
                };
            }
        }

        self.fallback(&normalized).to_string()
    }

    /// Keyword-group fallback for unmatched queries, checked in fixed
    /// priority order.
    fn fallback(&self, normalized: &str) -> &'static str {
        let contains_any =
            |keywords: &[&str]| keywords.iter().any(|k| normalized.contains(k));

        if contains_any(&knowledge::ENERGY_KEYWORDS) {
            knowledge::ENERGY_TOPIC
        } else if contains_any(&knowledge::EXPORT_KEYWORDS) {
            knowledge::EXPORT_TOPIC
        } else if contains_any(&knowledge::PERFORMANCE_KEYWORDS) {
            knowledge::PERFORMANCE_TOPIC
        } else {
            knowledge::GENERIC_MENU
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
