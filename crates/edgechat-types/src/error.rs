use std::time::Duration;

use thiserror::Error;

/// Errors from message store operations.
///
/// These are fatal to the in-flight operation and are never retried or
/// masked by the chat orchestrator.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database connection error: {0}")]
    Connection(String),

    #[error("query error: {0}")]
    Query(String),

    #[error("invalid message role: '{0}'")]
    InvalidRole(String),

    #[error("invalid stored row: {0}")]
    Decode(String),
}

impl StoreError {
    /// Whether the error was caused by caller input rather than the store.
    pub fn is_validation(&self) -> bool {
        matches!(self, StoreError::InvalidRole(_))
    }
}

/// Errors from the language-model backend.
///
/// The chat orchestrator absorbs these into a visible `"Error: ..."`
/// assistant message instead of propagating them.
#[derive(Debug, Error)]
pub enum BackendError {
    #[error("backend request timed out after {after:?}")]
    Timeout { after: Duration },

    #[error("backend returned HTTP {status}: {body}")]
    Http { status: u16, body: String },

    #[error("backend request failed: {0}")]
    Transport(String),

    #[error("malformed backend response: {0}")]
    Decode(String),

    #[error("empty response from backend")]
    EmptyReply,
}
