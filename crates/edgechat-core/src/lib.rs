//! Conversation session and history logic for edgechat.
//!
//! This crate defines the "ports" the infrastructure layer implements
//! (`MessageStore`, `ChatBackend`) and the logic built on them: history
//! reconstruction, session management, and the chat orchestrator. It
//! depends only on `edgechat-types` -- never on `edgechat-infra` or any
//! database/HTTP crate.

pub mod chat;
pub mod history;
pub mod llm;
pub mod session;
pub mod store;

#[cfg(test)]
pub(crate) mod testing;
