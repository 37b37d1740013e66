//! HTTP server for the dashboard backend.
//!
//! Axum-based JSON API: a stateless chat endpoint, session lifecycle
//! endpoints, sequence loading, and simulation runs.

pub mod routes;

pub use routes::{app_router, AppState};
