//! Ollama chat backend.
//!
//! This module provides the [`OllamaBackend`] which implements the
//! [`ChatBackend`](edgechat_core::llm::ChatBackend) trait for the
//! non-streaming Ollama chat API.

pub mod client;
pub mod types;

pub use client::OllamaBackend;
