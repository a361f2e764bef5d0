//! Session identity and session index types.
//!
//! A session has no record of its own: it is the set of stored messages
//! sharing one `session_id`. These types describe that identity and the
//! per-session index entry shown to the display layer.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use std::fmt;

/// Number of characters of the first message shown in a session label.
const LABEL_PREVIEW_CHARS: usize = 50;

/// Opaque session identifier.
///
/// Server-generated ids are UUID v7 strings, but any client-supplied
/// string is accepted as-is.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(String);

impl SessionId {
    /// Generate a new globally unique session id (UUID v7).
    pub fn generate() -> Self {
        Self(Uuid::now_v7().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for SessionId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for SessionId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl AsRef<str> for SessionId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// One entry of the session index, derived from the session's earliest
/// user-role message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionIndexEntry {
    pub session_id: SessionId,
    pub first_message: String,
    pub first_created_at: DateTime<Utc>,
}

impl SessionIndexEntry {
    /// Human-readable label: a preview of the first message followed by
    /// its timestamp, e.g. `"Hello there... (2026-10-19 08:15:02)"`.
    pub fn label(&self) -> String {
        let preview: String = self.first_message.chars().take(LABEL_PREVIEW_CHARS).collect();
        format!(
            "{preview}... ({})",
            self.first_created_at.format("%Y-%m-%d %H:%M:%S")
        )
    }
}

/// Whether a session id has any stored messages yet.
///
/// An unstarted session is only an identifier; fetching its history
/// yields an empty sequence, exactly like an active session with no
/// messages would.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionState {
    Unstarted,
    Active,
}
