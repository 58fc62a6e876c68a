// src/server/handlers.rs
// HTTP handlers

use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::info;

use super::error::{ApiError, ApiResult};
use super::state::AppState;
use crate::error::Error;
use crate::session::{Session, Turn};

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct AnalyzeRequest {
    #[serde(default)]
    pub panic_log: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AnalyzeResponse {
    pub status: String,
    pub analysis: String,
    pub input_length: usize,
}

/// Chat request; the caller owns the history and sends it every time
#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub history: Option<Vec<Turn>>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ChatResponse {
    pub status: String,
    pub response: String,
    /// Echo of the user's message
    pub message: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RootResponse {
    pub message: String,
    pub version: String,
    pub endpoints: Vec<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub gemini_initialized: bool,
}

pub const ENDPOINTS: [&str; 5] = [
    "GET /",
    "GET /health",
    "GET /ping",
    "POST /analyze",
    "POST /chat",
];

// ============================================================================
// Handlers
// ============================================================================

/// GET /
pub async fn root() -> Json<RootResponse> {
    Json(RootResponse {
        message: "AI Backend đang hoạt động.".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        endpoints: ENDPOINTS.iter().map(|e| e.to_string()).collect(),
    })
}

/// GET /health
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        gemini_initialized: state.gemini_initialized(),
    })
}

/// GET /ping
pub async fn ping() -> Json<serde_json::Value> {
    Json(serde_json::json!({"status": "alive"}))
}

/// POST /analyze
pub async fn analyze(
    State(state): State<AppState>,
    payload: Result<Json<AnalyzeRequest>, JsonRejection>,
) -> ApiResult<Json<AnalyzeResponse>> {
    let Json(request) = payload?;
    require_text("panic_log", &request.panic_log)?;
    let assistant = state.require_assistant()?;

    let input_length = request.panic_log.chars().count();
    let analysis = assistant
        .analyze(&request.panic_log)
        .await
        .map_err(|e| ApiError::gateway(&e))?;

    info!(input_length, output_length = analysis.chars().count(), "Panic log analyzed");

    Ok(Json(AnalyzeResponse {
        status: "success".to_string(),
        analysis,
        input_length,
    }))
}

/// POST /chat
pub async fn chat(
    State(state): State<AppState>,
    payload: Result<Json<ChatRequest>, JsonRejection>,
) -> ApiResult<Json<ChatResponse>> {
    let Json(request) = payload?;
    require_text("message", &request.message)?;
    let assistant = state.require_assistant()?;

    // Per-request session, discarded after the response
    let mut session = Session::from_turns(request.history.unwrap_or_default());
    let response = assistant
        .respond(&mut session, &request.message)
        .await
        .map_err(|e| ApiError::gateway(&e))?;

    info!(
        session_id = %session.id(),
        history_turns = session.len().saturating_sub(2),
        "Chat message answered"
    );

    Ok(Json(ChatResponse {
        status: "success".to_string(),
        response,
        message: request.message,
    }))
}

fn require_text(field: &str, value: &str) -> Result<(), Error> {
    if value.trim().is_empty() {
        return Err(Error::Validation(format!("{} must not be empty", field)));
    }
    Ok(())
}
