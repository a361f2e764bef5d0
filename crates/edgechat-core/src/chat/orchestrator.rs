//! Chat orchestrator: one user turn, end to end.
//!
//! Generic over `MessageStore` and `ChatBackend` so the store handle and
//! backend client are injected (edgechat-core never depends on
//! edgechat-infra). Each turn re-reads history from the store; nothing is
//! cached between turns, so exchanges persisted by other callers on the
//! same session are always visible.

use std::time::Instant;

use serde::Serialize;
use tracing::{Instrument, debug, error, info, info_span};

use edgechat_types::error::{BackendError, StoreError};
use edgechat_types::llm::{ChatReply, ChatRequest, PromptMessage};
use edgechat_types::message::{MessageRole, StoredMessage, TurnPair};
use edgechat_types::session::{SessionId, SessionIndexEntry, SessionState};

use super::ChatSettings;
use crate::history::{to_prompt, to_turns};
use crate::llm::ChatBackend;
use crate::session::SessionManager;
use crate::store::MessageStore;

/// Result of a turn: the refreshed paired view plus the reply metadata.
#[derive(Debug, Clone, Serialize)]
pub struct TurnOutcome {
    pub session_id: SessionId,
    pub turns: Vec<TurnPair>,
    /// Metadata of the latest reply; empty when the turn was a no-op or
    /// the backend failed.
    pub metadata: serde_json::Map<String, serde_json::Value>,
}

impl TurnOutcome {
    /// Pretty-printed metadata, as shown next to the transcript.
    pub fn metadata_json(&self) -> String {
        serde_json::to_string_pretty(&self.metadata).unwrap_or_else(|_| "{}".to_string())
    }
}

/// Coordinates the message store and the chat backend.
pub struct ChatOrchestrator<S: MessageStore, B: ChatBackend> {
    store: S,
    backend: B,
    settings: ChatSettings,
}

impl<S: MessageStore, B: ChatBackend> ChatOrchestrator<S, B> {
    pub fn new(store: S, backend: B, settings: ChatSettings) -> Self {
        Self {
            store,
            backend,
            settings,
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn settings(&self) -> &ChatSettings {
        &self.settings
    }

    /// Handle one user submission.
    ///
    /// The user message is persisted before the backend is called, so it
    /// survives any backend failure. Backend failures (including the
    /// configured timeout) become a persisted `"Error: ..."` assistant
    /// reply. Store failures are returned to the caller untouched.
    ///
    /// An empty `user_text` performs no writes and returns the same
    /// unbounded view a completed turn would.
    pub async fn handle_turn(
        &self,
        session_id: &SessionId,
        user_text: &str,
    ) -> Result<TurnOutcome, StoreError> {
        if user_text.is_empty() {
            debug!(session_id = %session_id, "Ignoring empty user message");
            return Ok(TurnOutcome {
                session_id: session_id.clone(),
                turns: to_turns(&self.store.fetch(session_id, None).await?),
                metadata: serde_json::Map::new(),
            });
        }

        let history = self
            .store
            .fetch(session_id, Some(self.settings.history_limit))
            .await?;
        let prompt = to_prompt(&history, user_text, &self.settings.system_prompt);

        self.store
            .append(
                session_id,
                MessageRole::User,
                user_text,
                Some(&serde_json::Value::Object(serde_json::Map::new())),
            )
            .await?;

        let (reply, metadata) = match self.call_backend(session_id, prompt).await {
            Ok(reply) => (reply.content, reply.metadata),
            Err(e) => {
                error!(session_id = %session_id, backend = self.backend.name(), error = %e, "Chat failed");
                (format!("Error: {e}"), serde_json::Map::new())
            }
        };

        self.store
            .append(
                session_id,
                MessageRole::Assistant,
                &reply,
                Some(&serde_json::Value::Object(metadata.clone())),
            )
            .await?;

        let log = self.store.fetch(session_id, None).await?;

        Ok(TurnOutcome {
            session_id: session_id.clone(),
            turns: to_turns(&log),
            metadata,
        })
    }

    /// Send the prompt under the configured timeout.
    async fn call_backend(
        &self,
        session_id: &SessionId,
        messages: Vec<PromptMessage>,
    ) -> Result<ChatReply, BackendError> {
        let request = ChatRequest {
            model: self.backend.model().to_string(),
            messages,
        };
        let timeout = self.settings.request_timeout;
        let start = Instant::now();

        let span = info_span!(
            "gen_ai.chat",
            gen_ai.system = self.backend.name(),
            gen_ai.request.model = %request.model,
            session_id = %session_id,
        );
        let call = tokio::time::timeout(timeout, self.backend.chat(&request)).instrument(span);

        let reply = match call.await {
            Ok(result) => result?,
            Err(_) => {
                return Err(BackendError::Timeout { after: timeout });
            }
        };

        if reply.content.is_empty() {
            return Err(BackendError::EmptyReply);
        }

        info!(
            session_id = %session_id,
            model = %request.model,
            prompt_messages = request.messages.len(),
            response_ms = start.elapsed().as_millis() as u64,
            "Backend replied"
        );
        Ok(reply)
    }

    /// Paired view of a session, bounded by the replay limit.
    pub async fn load_turns(&self, session_id: &SessionId) -> Result<Vec<TurnPair>, StoreError> {
        let history = self
            .store
            .fetch(session_id, Some(self.settings.history_limit))
            .await?;
        Ok(to_turns(&history))
    }

    /// Raw message log of a session.
    pub async fn messages(
        &self,
        session_id: &SessionId,
        limit: Option<u32>,
    ) -> Result<Vec<StoredMessage>, StoreError> {
        self.store.fetch(session_id, limit).await
    }

    /// Sessions available for selection, labelled by their first message.
    pub async fn session_index(&self) -> Result<Vec<SessionIndexEntry>, StoreError> {
        self.store.list_sessions().await
    }

    /// Whether `session_id` has any stored messages.
    pub async fn session_state(&self, session_id: &SessionId) -> Result<SessionState, StoreError> {
        SessionManager::state(&self.store, session_id).await
    }

    /// Allocate a fresh, unstarted session.
    pub fn start_session(&self) -> SessionId {
        let id = SessionManager::new_session();
        debug!(session_id = %id, "New session allocated");
        id
    }

    /// Switch to `target` (or stay on `current` when `target` is empty)
    /// and load its paired view.
    pub async fn switch_session(
        &self,
        target: &SessionId,
        current: &SessionId,
    ) -> Result<(SessionId, Vec<TurnPair>), StoreError> {
        let selected = SessionManager::switch(target, current);
        let turns = self.load_turns(&selected).await?;
        Ok((selected, turns))
    }

    /// Delete a session and hand back a fresh one to continue in.
    pub async fn delete_session(&self, session_id: &SessionId) -> Result<SessionId, StoreError> {
        let removed = self.store.delete(session_id).await?;
        info!(session_id = %session_id, removed, "Deleted session");
        Ok(self.start_session())
    }

    /// Delete every session and hand back a fresh one to continue in.
    pub async fn delete_all_sessions(&self) -> Result<SessionId, StoreError> {
        let removed = self.store.delete_all().await?;
        info!(removed, "Deleted all sessions");
        Ok(self.start_session())
    }
}
