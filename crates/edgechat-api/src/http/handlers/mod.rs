//! HTTP request handlers for the REST API.

pub mod chat;
pub mod session;

use edgechat_types::session::SessionId;

use crate::http::error::AppError;

/// Accept a client-supplied session id; blank ids are rejected.
fn parse_session_id(s: String) -> Result<SessionId, AppError> {
    if s.trim().is_empty() {
        return Err(AppError::Validation("session id must not be empty".to_string()));
    }
    Ok(SessionId::from(s))
}
