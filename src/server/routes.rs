//! Axum route handlers for the dashboard backend.
//!
//! # Routes
//!
//! - `GET    /health`                      — liveness probe
//! - `POST   /chat`                        — stateless chat, context supplied by the caller
//! - `POST   /sessions`                    — create a session
//! - `GET    /sessions/:id`                — session state
//! - `DELETE /sessions/:id`                — tear a session down
//! - `POST   /sessions/:id/sequence`       — load a sequence (manual, PDB, or UniProt)
//! - `POST   /sessions/:id/run`            — run the synthetic optimization
//! - `GET    /sessions/:id/structure`      — procedurally generated backbone
//! - `POST   /sessions/:id/chat`           — session-scoped chat, appends to the transcript
//! - `GET    /sessions/:id/transcript`     — ordered chat transcript

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use serde_json::Value;
use tower_http::cors::CorsLayer;
use uuid::Uuid;

use crate::context::{Session, SessionContext};
use crate::llms::responder::Responder;
use crate::sequence;
use crate::simulation::{self, VqeConfig};

/// Shared application state for the HTTP server.
#[derive(Clone)]
pub struct AppState {
    /// Per-session state, keyed by session id. Sessions never share data.
    pub sessions: Arc<RwLock<HashMap<Uuid, Session>>>,
    /// Fallback chain used by both chat endpoints.
    pub responder: Arc<Responder>,
}

impl AppState {
    pub fn new() -> Self {
        Self::with_responder(Responder::new())
    }

    pub fn with_responder(responder: Responder) -> Self {
        Self {
            sessions: Arc::new(RwLock::new(HashMap::new())),
            responder: Arc::new(responder),
        }
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

/// Build the axum router with all routes.
pub fn app_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route("/chat", post(chat_handler))
        .route("/sessions", post(create_session_handler))
        .route(
            "/sessions/{id}",
            get(get_session_handler).delete(delete_session_handler),
        )
        .route("/sessions/{id}/sequence", post(set_sequence_handler))
        .route("/sessions/{id}/run", post(run_handler))
        .route("/sessions/{id}/structure", get(structure_handler))
        .route("/sessions/{id}/chat", post(session_chat_handler))
        .route("/sessions/{id}/transcript", get(transcript_handler))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

type HandlerError = (StatusCode, Json<Value>);

fn internal_error(detail: &str) -> HandlerError {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(serde_json::json!({ "detail": detail })),
    )
}

fn not_found(detail: String) -> HandlerError {
    (
        StatusCode::NOT_FOUND,
        Json(serde_json::json!({ "detail": detail })),
    )
}

fn bad_request(detail: String) -> HandlerError {
    (
        StatusCode::BAD_REQUEST,
        Json(serde_json::json!({ "detail": detail })),
    )
}

// ---------------------------------------------------------------------------
// Health and stateless chat
// ---------------------------------------------------------------------------

/// GET /health — liveness probe.
async fn health_handler() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "version": crate::VERSION,
        "service": "qpfold",
    }))
}

#[derive(Debug, Deserialize)]
struct ChatRequest {
    /// Model selector, e.g. "Gemini (Google)" or "ChatGPT (OpenAI)".
    #[serde(default)]
    model: Option<String>,
    query: String,
    #[serde(default)]
    context: Option<SessionContext>,
}

/// POST /chat — stateless chat with caller-supplied context.
///
/// Always answers with a `{"response": ...}` object; provider failures
/// degrade to the local knowledge base and are never mapped to HTTP errors.
async fn chat_handler(
    State(state): State<AppState>,
    Json(request): Json<ChatRequest>,
) -> Json<Value> {
    let ctx = request.context.unwrap_or_default();
    let response = state
        .responder
        .respond(request.model.as_deref(), &request.query, &ctx)
        .await;
    Json(serde_json::json!({ "response": response }))
}

// ---------------------------------------------------------------------------
// Session lifecycle
// ---------------------------------------------------------------------------

/// POST /sessions — create an empty session.
async fn create_session_handler(
    State(state): State<AppState>,
) -> Result<Json<Value>, HandlerError> {
    let id = Uuid::new_v4();
    let mut sessions = state
        .sessions
        .write()
        .map_err(|_| internal_error("Session store lock poisoned"))?;
    sessions.insert(id, Session::new());
    tracing::info!("session {} created", id);
    Ok(Json(serde_json::json!({ "session_id": id })))
}

/// GET /sessions/:id — full session state.
async fn get_session_handler(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Session>, HandlerError> {
    let sessions = state
        .sessions
        .read()
        .map_err(|_| internal_error("Session store lock poisoned"))?;
    let session = sessions
        .get(&id)
        .ok_or_else(|| not_found(format!("Session '{}' not found", id)))?;
    Ok(Json(session.clone()))
}

/// DELETE /sessions/:id — tear the session down.
async fn delete_session_handler(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Value>, HandlerError> {
    let mut sessions = state
        .sessions
        .write()
        .map_err(|_| internal_error("Session store lock poisoned"))?;
    sessions
        .remove(&id)
        .ok_or_else(|| not_found(format!("Session '{}' not found", id)))?;
    tracing::info!("session {} deleted", id);
    Ok(Json(serde_json::json!({ "status": "deleted" })))
}

// ---------------------------------------------------------------------------
// Sequence loading
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct SequenceRequest {
    /// Manually entered sequence.
    #[serde(default)]
    sequence: Option<String>,
    /// RCSB PDB structure id, e.g. "1YCR".
    #[serde(default)]
    pdb_id: Option<String>,
    /// UniProt accession, e.g. "P12345".
    #[serde(default)]
    uniprot_id: Option<String>,
}

/// POST /sessions/:id/sequence — validate and store a sequence.
///
/// Exactly one source: `sequence` (validated manual entry), `pdb_id`, or
/// `uniprot_id`. Lookups that miss report a failed-to-fetch state.
async fn set_sequence_handler(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<SequenceRequest>,
) -> Result<Json<Value>, HandlerError> {
    let raw = if let Some(seq) = request.sequence {
        seq
    } else if let Some(pdb_id) = request.pdb_id {
        sequence::fetch_from_pdb(&pdb_id)
            .await
            .ok()
            .flatten()
            .ok_or_else(|| not_found(format!("Failed to fetch PDB entry '{}'", pdb_id)))?
    } else if let Some(uniprot_id) = request.uniprot_id {
        sequence::fetch_from_uniprot(&uniprot_id)
            .await
            .ok()
            .flatten()
            .ok_or_else(|| not_found(format!("Failed to fetch UniProt entry '{}'", uniprot_id)))?
    } else {
        return Err(bad_request(
            "Provide one of 'sequence', 'pdb_id', or 'uniprot_id'".to_string(),
        ));
    };

    let validated = sequence::validate_sequence(&raw).map_err(|e| bad_request(e.to_string()))?;
    let length = validated.len();

    let mut sessions = state
        .sessions
        .write()
        .map_err(|_| internal_error("Session store lock poisoned"))?;
    let session = sessions
        .get_mut(&id)
        .ok_or_else(|| not_found(format!("Session '{}' not found", id)))?;
    session.set_sequence(validated);

    Ok(Json(serde_json::json!({
        "length": length,
        "num_qubits": simulation::qubit_count(length),
        "preview": session.context.current_protein,
    })))
}

// ---------------------------------------------------------------------------
// Simulation
// ---------------------------------------------------------------------------

/// POST /sessions/:id/run — run the synthetic optimization.
///
/// Body: optional [`VqeConfig`] fields (ansatz, optimizer, max_iterations).
/// Stores the results in the session and returns the quantum run, the
/// classical baseline, and the improvement.
async fn run_handler(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(config): Json<VqeConfig>,
) -> Result<Json<Value>, HandlerError> {
    let mut sessions = state
        .sessions
        .write()
        .map_err(|_| internal_error("Session store lock poisoned"))?;
    let session = sessions
        .get_mut(&id)
        .ok_or_else(|| not_found(format!("Session '{}' not found", id)))?;

    let seq = session
        .sequence
        .clone()
        .ok_or_else(|| bad_request("No sequence loaded. Load a sequence first.".to_string()))?;

    let results = simulation::run_vqe(&seq, &config);
    let classical = simulation::run_classical(results.final_energy);
    let improvement = classical.final_energy - results.final_energy;

    session.set_results(results.clone());
    session.set_analysis(format!(
        "Quantum found a structure {:.4} Hartree more stable than the classical baseline",
        improvement
    ));

    tracing::info!(
        "session {} ran {} iterations, final energy {:.4}",
        id,
        results.iterations,
        results.final_energy
    );

    Ok(Json(serde_json::json!({
        "quantum": results,
        "classical": classical,
        "improvement": improvement,
    })))
}

/// GET /sessions/:id/structure — backbone coordinates for the loaded
/// sequence.
async fn structure_handler(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Value>, HandlerError> {
    let sessions = state
        .sessions
        .read()
        .map_err(|_| internal_error("Session store lock poisoned"))?;
    let session = sessions
        .get(&id)
        .ok_or_else(|| not_found(format!("Session '{}' not found", id)))?;

    let seq = session
        .sequence
        .as_deref()
        .ok_or_else(|| bad_request("No sequence loaded. Load a sequence first.".to_string()))?;

    Ok(Json(serde_json::json!({
        "coordinates": simulation::backbone_coordinates(seq),
    })))
}

// ---------------------------------------------------------------------------
// Session-scoped chat
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct SessionChatRequest {
    #[serde(default)]
    model: Option<String>,
    query: String,
}

/// POST /sessions/:id/chat — chat against the stored session context and
/// append the exchange to the transcript.
async fn session_chat_handler(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<SessionChatRequest>,
) -> Result<Json<Value>, HandlerError> {
    // Snapshot the context so the (possibly slow) remote call runs without
    // holding the store lock.
    let ctx = {
        let sessions = state
            .sessions
            .read()
            .map_err(|_| internal_error("Session store lock poisoned"))?;
        sessions
            .get(&id)
            .map(|s| s.context.clone())
            .ok_or_else(|| not_found(format!("Session '{}' not found", id)))?
    };

    let response = state
        .responder
        .respond(request.model.as_deref(), &request.query, &ctx)
        .await;

    let mut sessions = state
        .sessions
        .write()
        .map_err(|_| internal_error("Session store lock poisoned"))?;
    if let Some(session) = sessions.get_mut(&id) {
        session.record_exchange(&request.query, &response);
    }

    Ok(Json(serde_json::json!({ "response": response })))
}

/// GET /sessions/:id/transcript — the ordered chat transcript.
async fn transcript_handler(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Value>, HandlerError> {
    let sessions = state
        .sessions
        .read()
        .map_err(|_| internal_error("Session store lock poisoned"))?;
    let session = sessions
        .get(&id)
        .ok_or_else(|| not_found(format!("Session '{}' not found", id)))?;
    Ok(Json(serde_json::json!({ "transcript": session.transcript })))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::Request;
    use tower::ServiceExt;

    /// State with no remote providers: every chat degrades to the local
    /// knowledge base, with no diagnostic prefix.
    fn local_only_state() -> AppState {
        AppState::with_responder(Responder::with_providers(vec![]))
    }

    async fn json_body(response: axum::response::Response) -> Value {
        let bytes = axum::body::to_bytes(response.into_body(), 1 << 20)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn post_json(uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("Content-Type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn get_req(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    async fn create_session(app: &Router) -> Uuid {
        let response = app
            .clone()
            .oneshot(post_json("/sessions", serde_json::json!({})))
            .await
            .unwrap();
        let json = json_body(response).await;
        json["session_id"].as_str().unwrap().parse().unwrap()
    }

    #[tokio::test]
    async fn health_reports_ok() {
        let app = app_router(local_only_state());
        let response = app.oneshot(get_req("/health")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let json = json_body(response).await;
        assert_eq!(json["status"], "ok");
        assert_eq!(json["version"], crate::VERSION);
    }

    #[tokio::test]
    async fn stateless_chat_uses_caller_context() {
        let app = app_router(local_only_state());
        let response = app
            .oneshot(post_json(
                "/chat",
                serde_json::json!({
                    "query": "show me my results",
                    "context": { "vqe_results": "Not run yet" },
                }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let json = json_body(response).await;
        let text = json["response"].as_str().unwrap();
        assert!(text.contains("No VQE Results Available"));
    }

    #[tokio::test]
    async fn stateless_chat_without_context_answers_literals() {
        let app = app_router(local_only_state());
        let response = app
            .oneshot(post_json(
                "/chat",
                serde_json::json!({ "query": "What is VQE?" }),
            ))
            .await
            .unwrap();
        let json = json_body(response).await;
        assert!(json["response"]
            .as_str()
            .unwrap()
            .contains("Variational Quantum Eigensolver"));
    }

    #[tokio::test]
    async fn session_lifecycle_sequence_run_chat() {
        let app = app_router(local_only_state());
        let id = create_session(&app).await;

        // Load a sequence.
        let response = app
            .clone()
            .oneshot(post_json(
                &format!("/sessions/{}/sequence", id),
                serde_json::json!({ "sequence": "ACDEFGHIKL" }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let json = json_body(response).await;
        assert_eq!(json["length"], 10);
        assert_eq!(json["num_qubits"], 27);

        // Run the simulation.
        let response = app
            .clone()
            .oneshot(post_json(
                &format!("/sessions/{}/run", id),
                serde_json::json!({ "max_iterations": 50 }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let json = json_body(response).await;
        assert!(json["improvement"].as_f64().unwrap() > 0.0);
        assert_eq!(json["quantum"]["iterations"], 50);

        // The chat path now sees the results through the session context.
        let response = app
            .clone()
            .oneshot(post_json(
                &format!("/sessions/{}/chat", id),
                serde_json::json!({ "query": "show me my results" }),
            ))
            .await
            .unwrap();
        let json = json_body(response).await;
        assert!(json["response"]
            .as_str()
            .unwrap()
            .contains("Optimization Complete"));

        // And the transcript recorded the exchange.
        let response = app
            .clone()
            .oneshot(get_req(&format!("/sessions/{}/transcript", id)))
            .await
            .unwrap();
        let json = json_body(response).await;
        assert_eq!(json["transcript"].as_array().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn invalid_sequence_is_rejected_before_any_computation() {
        let app = app_router(local_only_state());
        let id = create_session(&app).await;

        let response = app
            .clone()
            .oneshot(post_json(
                &format!("/sessions/{}/sequence", id),
                serde_json::json!({ "sequence": "ACDXZ9" }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json = json_body(response).await;
        assert!(json["detail"].as_str().unwrap().contains("Invalid residue"));
    }

    #[tokio::test]
    async fn run_without_sequence_is_rejected() {
        let app = app_router(local_only_state());
        let id = create_session(&app).await;

        let response = app
            .clone()
            .oneshot(post_json(
                &format!("/sessions/{}/run", id),
                serde_json::json!({}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn structure_returns_one_triple_per_residue() {
        let app = app_router(local_only_state());
        let id = create_session(&app).await;

        let _ = app
            .clone()
            .oneshot(post_json(
                &format!("/sessions/{}/sequence", id),
                serde_json::json!({ "sequence": "ACDEF" }),
            ))
            .await
            .unwrap();

        let response = app
            .clone()
            .oneshot(get_req(&format!("/sessions/{}/structure", id)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let json = json_body(response).await;
        assert_eq!(json["coordinates"].as_array().unwrap().len(), 5);
    }

    #[tokio::test]
    async fn deleted_sessions_are_gone() {
        let app = app_router(local_only_state());
        let id = create_session(&app).await;

        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .method("DELETE")
                    .uri(format!("/sessions/{}", id))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let response = app
            .clone()
            .oneshot(get_req(&format!("/sessions/{}", id)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn unknown_session_is_not_found() {
        let app = app_router(local_only_state());
        let response = app
            .oneshot(get_req(&format!("/sessions/{}", Uuid::new_v4())))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
