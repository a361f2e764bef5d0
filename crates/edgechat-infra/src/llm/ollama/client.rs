//! OllamaBackend: concrete [`ChatBackend`] for the Ollama chat API.
//!
//! Sends one non-streaming `POST {base_url}/api/chat` per turn and maps
//! every failure mode onto [`BackendError`].

use std::time::Duration;

use edgechat_core::llm::ChatBackend;
use edgechat_types::config::BackendConfig;
use edgechat_types::error::BackendError;
use edgechat_types::llm::{ChatReply, ChatRequest};

use super::types::{OllamaChatRequest, OllamaChatResponse, OllamaMessage};

/// Ollama chat backend.
pub struct OllamaBackend {
    client: reqwest::Client,
    base_url: String,
    model: String,
    timeout: Duration,
}

impl OllamaBackend {
    /// Create a backend for `base_url` (e.g. `http://ollama:11434`).
    ///
    /// `timeout` bounds the whole HTTP exchange.
    pub fn new(
        base_url: impl Into<String>,
        model: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, BackendError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| BackendError::Transport(format!("failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            model: model.into(),
            timeout,
        })
    }

    pub fn from_config(config: &BackendConfig) -> Result<Self, BackendError> {
        Self::new(
            config.base_url.clone(),
            config.model.clone(),
            Duration::from_secs(config.timeout_secs),
        )
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn chat_url(&self) -> String {
        format!("{}/api/chat", self.base_url)
    }

    fn to_ollama_request(request: &ChatRequest) -> OllamaChatRequest {
        OllamaChatRequest {
            model: request.model.clone(),
            messages: request
                .messages
                .iter()
                .map(|m| OllamaMessage {
                    role: m.role.to_string(),
                    content: m.content.clone(),
                })
                .collect(),
            stream: false,
        }
    }

    fn map_transport(&self, e: reqwest::Error) -> BackendError {
        if e.is_timeout() {
            BackendError::Timeout {
                after: self.timeout,
            }
        } else {
            BackendError::Transport(e.to_string())
        }
    }
}

impl ChatBackend for OllamaBackend {
    fn name(&self) -> &str {
        "ollama"
    }

    fn model(&self) -> &str {
        &self.model
    }

    async fn chat(&self, request: &ChatRequest) -> Result<ChatReply, BackendError> {
        let body = Self::to_ollama_request(request);

        let response = self
            .client
            .post(self.chat_url())
            .json(&body)
            .send()
            .await
            .map_err(|e| self.map_transport(e))?;

        let status = response.status();
        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            tracing::warn!(status = status.as_u16(), "ollama returned an error status");
            return Err(BackendError::Http {
                status: status.as_u16(),
                body: error_body,
            });
        }

        let text = response.text().await.map_err(|e| self.map_transport(e))?;
        let parsed: OllamaChatResponse = serde_json::from_str(&text)
            .map_err(|e| BackendError::Decode(format!("failed to parse response: {e}")))?;

        let content = parsed
            .message
            .as_ref()
            .map(|m| m.content.clone())
            .unwrap_or_default();
        if content.is_empty() {
            return Err(BackendError::EmptyReply);
        }

        Ok(ChatReply {
            metadata: parsed.reply_metadata(),
            content,
        })
    }
}
