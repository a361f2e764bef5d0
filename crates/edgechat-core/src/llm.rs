//! ChatBackend trait definition.
//!
//! The external language-model service. Implementations live in
//! edgechat-infra (e.g., `OllamaBackend`); tests use in-memory mocks.

use edgechat_types::error::BackendError;
use edgechat_types::llm::{ChatRequest, ChatReply};

/// Trait for language-model backends.
pub trait ChatBackend: Send + Sync {
    /// Human-readable backend name (e.g., "ollama").
    fn name(&self) -> &str;

    /// Model identifier sent with every request.
    fn model(&self) -> &str;

    /// Send a prompt and wait for the complete (non-streaming) reply.
    fn chat(
        &self,
        request: &ChatRequest,
    ) -> impl std::future::Future<Output = Result<ChatReply, BackendError>> + Send;
}
