//! Shared domain types for edgechat.
//!
//! Conversation messages, session identity, prompt/turn shapes, backend
//! request/response types, configuration, and the error taxonomy.
//!
//! Zero infrastructure dependencies -- only serde, uuid, chrono, thiserror.

pub mod config;
pub mod error;
pub mod llm;
pub mod message;
pub mod session;
