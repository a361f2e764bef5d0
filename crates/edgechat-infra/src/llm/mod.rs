//! Chat backend implementations.
//!
//! Contains concrete implementations of the
//! [`ChatBackend`](edgechat_core::llm::ChatBackend) trait, currently the
//! Ollama `/api/chat` client.

pub mod ollama;

pub use ollama::OllamaBackend;
