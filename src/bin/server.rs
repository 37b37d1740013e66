//! qpfold HTTP server binary.
//!
//! Starts the axum server for the dashboard backend.
//!
//! # Environment Variables
//!
//! - `PORT` — HTTP port (default: 8080)
//! - `GEMINI_API_KEY` / `GOOGLE_API_KEY` — Gemini credential (optional)
//! - `OPENAI_API_KEY` — OpenAI credential (optional)
//! - `RUST_LOG` — tracing filter (default: "info")
//!
//! With neither credential set the chat endpoints still work: every query is
//! answered by the local knowledge base.
//!
//! # Usage
//!
//! ```bash
//! cargo run --bin server
//! ```

use qpfold::server::{app_router, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,qpfold=debug".into()),
        )
        .init();

    let port = std::env::var("PORT").unwrap_or_else(|_| "8080".to_string());
    let bind_addr = format!("0.0.0.0:{}", port);

    let state = AppState::new();
    let app = app_router(state);

    tracing::info!("qpfold server starting on {}", bind_addr);
    tracing::info!("Endpoints:");
    tracing::info!("  GET  /health    — liveness probe");
    tracing::info!("  POST /chat      — stateless chat");
    tracing::info!("  POST /sessions  — session lifecycle");

    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
