//! Language-model backend request/response types.

use serde::{Deserialize, Serialize};

use crate::message::MessageRole;

/// One role/content entry of a prompt sent to the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromptMessage {
    pub role: MessageRole,
    pub content: String,
}

impl PromptMessage {
    pub fn new(role: MessageRole, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }
}

/// Request to a chat backend: an ordered prompt and the model to run it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatRequest {
    pub model: String,
    pub messages: Vec<PromptMessage>,
}

/// Successful backend reply.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ChatReply {
    pub content: String,
    /// Opaque metadata returned alongside the reply (timings, usage, ...).
    #[serde(default)]
    pub metadata: serde_json::Map<String, serde_json::Value>,
}
