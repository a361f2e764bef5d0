//! MessageStore trait definition.
//!
//! The durable, append-only conversation log. Uses native async fn in
//! traits (RPITIT, Rust 2024 edition); implementations live in
//! edgechat-infra (e.g., `SqliteMessageStore`).

use edgechat_types::error::StoreError;
use edgechat_types::message::{MessageRole, StoredMessage};
use edgechat_types::session::{SessionId, SessionIndexEntry};

/// Repository trait for the conversation message log.
///
/// Every error is a `StoreError` and is surfaced to the caller as-is;
/// implementations must not retry internally.
pub trait MessageStore: Send + Sync {
    /// Append one message. The store assigns `id` and `created_at`.
    ///
    /// The write is durable when the future resolves.
    fn append(
        &self,
        session_id: &SessionId,
        role: MessageRole,
        content: &str,
        metadata: Option<&serde_json::Value>,
    ) -> impl std::future::Future<Output = Result<StoredMessage, StoreError>> + Send;

    /// Get the oldest `limit` messages of a session in canonical order
    /// (`created_at ASC, id ASC`). `None` returns the whole session.
    ///
    /// An unknown session yields an empty vec, not an error.
    fn fetch(
        &self,
        session_id: &SessionId,
        limit: Option<u32>,
    ) -> impl std::future::Future<Output = Result<Vec<StoredMessage>, StoreError>> + Send;

    /// One entry per session that has at least one user message, built from
    /// that session's earliest user message, ordered by session id.
    fn list_sessions(
        &self,
    ) -> impl std::future::Future<Output = Result<Vec<SessionIndexEntry>, StoreError>> + Send;

    /// Delete every message of a session. Returns the number of rows
    /// removed; deleting an absent session removes nothing and succeeds.
    fn delete(
        &self,
        session_id: &SessionId,
    ) -> impl std::future::Future<Output = Result<u64, StoreError>> + Send;

    /// Delete every message of every session.
    fn delete_all(&self) -> impl std::future::Future<Output = Result<u64, StoreError>> + Send;
}
