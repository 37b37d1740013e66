//! Per-session state for the dashboard.
//!
//! A [`Session`] owns the loaded sequence, the last simulation results, the
//! chat transcript, and a [`SessionContext`] — the compact key/value view of
//! the session that the pattern router and the remote providers consume to
//! make answers sound session-aware.
//!
//! The context stores a *truncated* preview of the sequence to keep prompts
//! short, while the raw residue count is tracked separately so the router can
//! still derive exact numeric values (length, qubit estimate).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::simulation::VqeResults;

/// Maximum number of sequence characters stored in the context preview.
pub const SEQUENCE_PREVIEW_LEN: usize = 50;

/// Sentinel used by upstream clients for "no results yet".
pub const NOT_RUN_SENTINEL: &str = "Not run yet";

// ---------------------------------------------------------------------------
// Chat transcript
// ---------------------------------------------------------------------------

/// Who authored a transcript entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    User,
    Assistant,
}

/// A single transcript entry. Never mutated once appended.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: String,
    pub timestamp: DateTime<Utc>,
}

impl ChatMessage {
    pub fn new(role: ChatRole, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
            timestamp: Utc::now(),
        }
    }
}

// ---------------------------------------------------------------------------
// SessionContext
// ---------------------------------------------------------------------------

/// Compact session view consumed by the response-generation logic.
///
/// All fields are optional; clients of the stateless `/chat` endpoint may
/// supply any subset. String values equal to the `"None"` / `"Not run yet"`
/// sentinels are treated as absent, not as literal data.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SessionContext {
    /// Truncated preview of the loaded sequence (at most
    /// [`SEQUENCE_PREVIEW_LEN`] chars, `...` suffix when cut).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_protein: Option<String>,

    /// Raw residue count of the loaded sequence. Kept separate from the
    /// preview so numeric derivations stay exact after truncation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sequence_length: Option<usize>,

    /// String form of the last simulation results. Clients may send a
    /// structured record instead; it is flattened to its string form.
    #[serde(
        default,
        deserialize_with = "de_stringish",
        skip_serializing_if = "Option::is_none"
    )]
    pub vqe_results: Option<String>,

    /// Free-text summary of the last analysis step.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_analysis: Option<String>,
}

/// Accept either a string or an arbitrary JSON value, keeping its string
/// form.
fn de_stringish<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(value.map(|v| match v {
        serde_json::Value::String(s) => s,
        other => other.to_string(),
    }))
}

fn is_sentinel(value: &str) -> bool {
    let v = value.trim();
    v.is_empty() || v.eq_ignore_ascii_case("none") || v == NOT_RUN_SENTINEL
}

impl SessionContext {
    /// The sequence preview, if a sequence is actually loaded.
    pub fn loaded_protein(&self) -> Option<&str> {
        self.current_protein
            .as_deref()
            .filter(|s| !is_sentinel(s))
    }

    /// The results string, if an optimization has actually been run.
    pub fn available_results(&self) -> Option<&str> {
        self.vqe_results.as_deref().filter(|s| !is_sentinel(s))
    }

    /// Raw residue count of the loaded sequence.
    ///
    /// Falls back to the preview length (minus a trailing `...`) when the
    /// caller supplied a sequence without an explicit length.
    pub fn residue_count(&self) -> Option<usize> {
        if let Some(n) = self.sequence_length {
            return Some(n);
        }
        self.loaded_protein()
            .map(|seq| seq.trim_end_matches("...").len())
    }

    /// Context line values for provider prompts; `"None"` when unset.
    pub fn prompt_fields(&self) -> (String, String, String) {
        let field = |v: &Option<String>| {
            v.as_deref()
                .filter(|s| !is_sentinel(s))
                .unwrap_or("None")
                .to_string()
        };
        (
            field(&self.current_protein),
            field(&self.vqe_results),
            field(&self.last_analysis),
        )
    }
}

// ---------------------------------------------------------------------------
// Session
// ---------------------------------------------------------------------------

/// Full per-session state, torn down when the session ends.
///
/// Mutators keep the embedded [`SessionContext`] in sync so that the next
/// routed query always sees the current sequence and results.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Session {
    /// Full (untruncated) validated sequence.
    pub sequence: Option<String>,
    /// Last simulation results.
    pub results: Option<VqeResults>,
    /// Ordered chat transcript.
    pub transcript: Vec<ChatMessage>,
    /// Router/provider view of this session.
    pub context: SessionContext,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a validated sequence and refresh the context preview.
    ///
    /// Truncation counts characters, not bytes, so arbitrary input cannot
    /// split a multibyte character.
    pub fn set_sequence(&mut self, sequence: impl Into<String>) {
        let sequence = sequence.into();
        let residue_count = sequence.chars().count();
        let preview = if residue_count > SEQUENCE_PREVIEW_LEN {
            let head: String = sequence.chars().take(SEQUENCE_PREVIEW_LEN).collect();
            format!("{}...", head)
        } else {
            sequence.clone()
        };
        self.context.sequence_length = Some(residue_count);
        self.context.current_protein = Some(preview);
        self.sequence = Some(sequence);
    }

    /// Store simulation results and refresh the context summary.
    pub fn set_results(&mut self, results: VqeResults) {
        self.context.vqe_results = Some(results.summary());
        self.results = Some(results);
    }

    pub fn set_analysis(&mut self, analysis: impl Into<String>) {
        self.context.last_analysis = Some(analysis.into());
    }

    /// Append a user/assistant exchange to the transcript.
    pub fn record_exchange(&mut self, query: &str, response: &str) {
        self.transcript
            .push(ChatMessage::new(ChatRole::User, query));
        self.transcript
            .push(ChatMessage::new(ChatRole::Assistant, response));
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
