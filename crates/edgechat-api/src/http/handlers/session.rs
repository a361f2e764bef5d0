//! Session HTTP handlers.
//!
//! Endpoints:
//! - GET    /api/v1/sessions          - Session index with labels
//! - POST   /api/v1/sessions          - Allocate a new session id
//! - DELETE /api/v1/sessions          - Delete every session
//! - POST   /api/v1/sessions/switch   - Switch sessions and load turns
//! - DELETE /api/v1/sessions/{id}     - Delete one session

use std::time::Instant;

use axum::Json;
use axum::extract::{Path, State};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use edgechat_types::message::TurnPair;
use edgechat_types::session::{SessionId, SessionIndexEntry, SessionState};

use crate::http::error::AppError;
use crate::http::response::{ApiResponse, request_id};
use crate::state::AppState;

use super::parse_session_id;

/// One row of the session index.
#[derive(Debug, Serialize)]
pub struct SessionSummary {
    pub session_id: SessionId,
    pub label: String,
    pub first_message: String,
    pub first_created_at: DateTime<Utc>,
}

impl From<SessionIndexEntry> for SessionSummary {
    fn from(entry: SessionIndexEntry) -> Self {
        Self {
            label: entry.label(),
            session_id: entry.session_id,
            first_message: entry.first_message,
            first_created_at: entry.first_created_at,
        }
    }
}

/// A session id plus its paired view.
#[derive(Debug, Serialize)]
pub struct SessionView {
    pub session_id: SessionId,
    pub state: SessionState,
    pub turns: Vec<TurnPair>,
}

/// Request body for switching sessions.
#[derive(Debug, Deserialize)]
pub struct SwitchRequest {
    /// Session to switch to; empty or missing keeps `current`.
    #[serde(default)]
    pub target: String,
    pub current: String,
}

/// GET /api/v1/sessions - Session index.
pub async fn list_sessions(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<SessionSummary>>>, AppError> {
    let start = Instant::now();

    let entries = state.orchestrator.session_index().await?;
    let summaries: Vec<SessionSummary> = entries.into_iter().map(SessionSummary::from).collect();

    let elapsed = start.elapsed().as_millis() as u64;
    let resp = ApiResponse::success(summaries, request_id(), elapsed)
        .with_link("self", "/api/v1/sessions");

    Ok(Json(resp))
}

/// POST /api/v1/sessions - Allocate a new (unstarted) session.
pub async fn create_session(State(state): State<AppState>) -> Json<ApiResponse<serde_json::Value>> {
    let start = Instant::now();
    let session_id = state.orchestrator.start_session();

    let elapsed = start.elapsed().as_millis() as u64;
    let resp = ApiResponse::success(serde_json::json!({ "session_id": session_id }), request_id(), elapsed)
        .with_link("turns", &format!("/api/v1/sessions/{session_id}/turns"));

    Json(resp)
}

/// POST /api/v1/sessions/switch - Select a session and load its turns.
pub async fn switch_session(
    State(state): State<AppState>,
    Json(body): Json<SwitchRequest>,
) -> Result<Json<ApiResponse<SessionView>>, AppError> {
    let start = Instant::now();

    if body.current.is_empty() && body.target.is_empty() {
        return Err(AppError::Validation(
            "either target or current session id is required".to_string(),
        ));
    }

    let (session_id, turns) = state
        .orchestrator
        .switch_session(&SessionId::from(body.target), &SessionId::from(body.current))
        .await?;
    let session_state = state.orchestrator.session_state(&session_id).await?;

    let elapsed = start.elapsed().as_millis() as u64;
    let self_link = format!("/api/v1/sessions/{session_id}/turns");
    let view = SessionView {
        session_id,
        state: session_state,
        turns,
    };
    let resp = ApiResponse::success(view, request_id(), elapsed).with_link("self", &self_link);

    Ok(Json(resp))
}

/// DELETE /api/v1/sessions/{id} - Delete one session, returning a fresh id.
pub async fn delete_session(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> Result<Json<ApiResponse<serde_json::Value>>, AppError> {
    let start = Instant::now();

    let deleted = parse_session_id(session_id)?;
    let fresh = state.orchestrator.delete_session(&deleted).await?;

    let elapsed = start.elapsed().as_millis() as u64;
    let resp = ApiResponse::success(
        serde_json::json!({"deleted": true, "deleted_session": deleted, "session_id": fresh}),
        request_id(),
        elapsed,
    );

    Ok(Json(resp))
}

/// DELETE /api/v1/sessions - Delete every session, returning a fresh id.
pub async fn delete_all_sessions(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<serde_json::Value>>, AppError> {
    let start = Instant::now();

    let fresh = state.orchestrator.delete_all_sessions().await?;

    let elapsed = start.elapsed().as_millis() as u64;
    let resp = ApiResponse::success(
        serde_json::json!({"deleted": true, "session_id": fresh}),
        request_id(),
        elapsed,
    );

    Ok(Json(resp))
}
