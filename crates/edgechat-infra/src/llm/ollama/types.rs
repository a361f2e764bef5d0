//! Ollama chat API types.
//!
//! Wire structures for `POST /api/chat`. They are NOT the generic chat
//! types from edgechat-types; the client converts between the two.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Response fields copied into reply metadata when the server does not
/// send an explicit `metadata` object.
pub const USAGE_FIELDS: &[&str] = &[
    "model",
    "created_at",
    "done_reason",
    "total_duration",
    "load_duration",
    "prompt_eval_count",
    "prompt_eval_duration",
    "eval_count",
    "eval_duration",
];

/// Request body for `/api/chat`.
#[derive(Debug, Clone, Serialize)]
pub struct OllamaChatRequest {
    pub model: String,
    pub messages: Vec<OllamaMessage>,
    pub stream: bool,
}

/// A single message in an Ollama conversation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OllamaMessage {
    pub role: String,
    #[serde(default)]
    pub content: String,
}

/// Non-streaming response body from `/api/chat`.
#[derive(Debug, Clone, Deserialize)]
pub struct OllamaChatResponse {
    pub message: Option<OllamaMessage>,
    /// Explicit metadata object (sent by some Ollama-compatible proxies).
    pub metadata: Option<Map<String, Value>>,
    /// Everything else, including usage and timing counters.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl OllamaChatResponse {
    /// Reply metadata: the explicit `metadata` object if present, otherwise
    /// the usage fields found in the response.
    pub fn reply_metadata(&self) -> Map<String, Value> {
        if let Some(metadata) = &self.metadata {
            return metadata.clone();
        }
        USAGE_FIELDS
            .iter()
            .filter_map(|key| {
                self.extra
                    .get(*key)
                    .map(|value| (key.to_string(), value.clone()))
            })
            .collect()
    }
}
