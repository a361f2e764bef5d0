//! Session identity management.
//!
//! Sessions have no record of their own, so the manager is stateless: it
//! hands out identifiers and picks between them. The "current session" is
//! owned by the caller (the display layer).

use edgechat_types::error::StoreError;
use edgechat_types::session::{SessionId, SessionState};

use crate::store::MessageStore;

/// Allocates and selects session identifiers.
pub struct SessionManager;

impl SessionManager {
    /// Allocate a fresh session id.
    ///
    /// Nothing is written: the session becomes real once its first
    /// message is appended.
    pub fn new_session() -> SessionId {
        SessionId::generate()
    }

    /// Select `target` if it is non-empty, otherwise `fallback`.
    ///
    /// Existence is not checked; switching to an id with no messages
    /// simply yields an empty history.
    pub fn switch(target: &SessionId, fallback: &SessionId) -> SessionId {
        if target.is_empty() {
            fallback.clone()
        } else {
            target.clone()
        }
    }

    /// Whether any message has been stored under `session_id` yet.
    pub async fn state<S: MessageStore>(
        store: &S,
        session_id: &SessionId,
    ) -> Result<SessionState, StoreError> {
        let head = store.fetch(session_id, Some(1)).await?;
        Ok(if head.is_empty() {
            SessionState::Unstarted
        } else {
            SessionState::Active
        })
    }
}
