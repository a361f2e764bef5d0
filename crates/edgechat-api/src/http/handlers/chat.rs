//! Conversation HTTP handlers.
//!
//! Endpoints:
//! - POST /api/v1/sessions/{id}/messages - Run one chat turn
//! - GET  /api/v1/sessions/{id}/messages - Raw message log (`?limit=&role=`)
//! - GET  /api/v1/sessions/{id}/turns    - Paired view

use std::str::FromStr;
use std::time::Instant;

use axum::Json;
use axum::extract::{Path, Query, State};
use serde::Deserialize;

use edgechat_core::chat::orchestrator::TurnOutcome;
use edgechat_types::message::{MessageRole, StoredMessage, TurnPair};

use super::parse_session_id;
use crate::http::error::AppError;
use crate::http::response::{ApiResponse, request_id};
use crate::state::AppState;

/// Request body for a chat turn.
#[derive(Debug, Deserialize)]
pub struct TurnRequest {
    pub content: String,
}

/// Query parameters for the message log.
#[derive(Debug, Deserialize)]
pub struct MessageListQuery {
    /// Oldest N messages; the whole session when omitted.
    pub limit: Option<u32>,
    /// Keep only messages with this role (`system`, `user`, `assistant`).
    pub role: Option<String>,
}

/// POST /api/v1/sessions/{id}/messages - Send a user message.
///
/// Backend failures still return 200: the reply is the persisted
/// `"Error: ..."` message.
pub async fn send_message(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
    Json(body): Json<TurnRequest>,
) -> Result<Json<ApiResponse<TurnOutcome>>, AppError> {
    let start = Instant::now();

    let session_id = parse_session_id(session_id)?;
    let outcome = state
        .orchestrator
        .handle_turn(&session_id, &body.content)
        .await?;

    let elapsed = start.elapsed().as_millis() as u64;
    let resp = ApiResponse::success(outcome, request_id(), elapsed)
        .with_link("messages", &format!("/api/v1/sessions/{session_id}/messages"));

    Ok(Json(resp))
}

/// GET /api/v1/sessions/{id}/messages - Raw message log.
pub async fn get_messages(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
    Query(query): Query<MessageListQuery>,
) -> Result<Json<ApiResponse<Vec<StoredMessage>>>, AppError> {
    let start = Instant::now();

    let session_id = parse_session_id(session_id)?;
    let role = query.role.as_deref().map(MessageRole::from_str).transpose()?;
    let mut messages = state.orchestrator.messages(&session_id, query.limit).await?;
    if let Some(role) = role {
        messages.retain(|m| m.role == role);
    }

    let elapsed = start.elapsed().as_millis() as u64;
    let resp = ApiResponse::success(messages, request_id(), elapsed)
        .with_link("self", &format!("/api/v1/sessions/{session_id}/messages"))
        .with_link("turns", &format!("/api/v1/sessions/{session_id}/turns"));

    Ok(Json(resp))
}

/// GET /api/v1/sessions/{id}/turns - Paired view, bounded by the replay limit.
pub async fn get_turns(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> Result<Json<ApiResponse<Vec<TurnPair>>>, AppError> {
    let start = Instant::now();

    let session_id = parse_session_id(session_id)?;
    let turns = state.orchestrator.load_turns(&session_id).await?;

    let elapsed = start.elapsed().as_millis() as u64;
    let resp = ApiResponse::success(turns, request_id(), elapsed)
        .with_link("self", &format!("/api/v1/sessions/{session_id}/turns"));

    Ok(Json(resp))
}
