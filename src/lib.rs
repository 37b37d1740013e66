//! # qpfold
//!
//! Backend service for the quantum protein folding demo dashboard.
//!
//! The service exposes a JSON HTTP API for chatting with a fallback chain of
//! remote LLM providers that degrades gracefully to a local regex pattern
//! router, for loading and validating amino-acid sequences (manual entry,
//! PDB, UniProt), and for running a synthetic VQE-style optimization with a
//! classical baseline and a procedurally generated 3D backbone.
//!
//! None of the quantum computation is real: the `simulation` module
//! reproduces only the observable outputs of the demo (energy trajectories,
//! qubit estimates, backbone coordinates).

pub mod chatbot;
pub mod context;
pub mod llms;
pub mod sequence;
pub mod server;
pub mod simulation;

pub use chatbot::PatternRouter;
pub use context::{ChatMessage, ChatRole, Session, SessionContext};
pub use llms::provider::{FailureKind, ProviderFailure, RemoteProvider};
pub use llms::responder::Responder;

/// Service version reported by the health endpoint.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
