//! In-memory store and scripted backend used by the core unit tests.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use chrono::Utc;
use edgechat_types::error::{BackendError, StoreError};
use edgechat_types::llm::{ChatReply, ChatRequest};
use edgechat_types::message::{MessageRole, StoredMessage};
use edgechat_types::session::{SessionId, SessionIndexEntry};

use crate::llm::ChatBackend;
use crate::store::MessageStore;

/// Vec-backed `MessageStore` that counts writes and can be switched offline.
///
/// Clones share the same rows, so a test can hand one clone to the
/// orchestrator and keep another for inspection.
#[derive(Clone, Default)]
pub struct InMemoryStore {
    rows: Arc<Mutex<Vec<StoredMessage>>>,
    writes: Arc<AtomicUsize>,
    offline: Arc<AtomicBool>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn writes(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    /// Total rows across all sessions.
    pub fn len(&self) -> usize {
        self.rows.lock().unwrap().len()
    }

    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    fn check_online(&self) -> Result<(), StoreError> {
        if self.offline.load(Ordering::SeqCst) {
            return Err(StoreError::Connection("store offline".to_string()));
        }
        Ok(())
    }
}

impl MessageStore for InMemoryStore {
    async fn append(
        &self,
        session_id: &SessionId,
        role: MessageRole,
        content: &str,
        metadata: Option<&serde_json::Value>,
    ) -> Result<StoredMessage, StoreError> {
        self.check_online()?;
        let mut rows = self.rows.lock().unwrap();
        let message = StoredMessage {
            id: rows.last().map(|m| m.id + 1).unwrap_or(1),
            session_id: session_id.clone(),
            role,
            content: content.to_string(),
            created_at: Utc::now(),
            metadata: metadata.cloned(),
        };
        rows.push(message.clone());
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(message)
    }

    async fn fetch(
        &self,
        session_id: &SessionId,
        limit: Option<u32>,
    ) -> Result<Vec<StoredMessage>, StoreError> {
        self.check_online()?;
        let rows = self.rows.lock().unwrap();
        let limit = limit.map(|l| l as usize).unwrap_or(usize::MAX);
        Ok(rows
            .iter()
            .filter(|m| &m.session_id == session_id)
            .take(limit)
            .cloned()
            .collect())
    }

    async fn list_sessions(&self) -> Result<Vec<SessionIndexEntry>, StoreError> {
        self.check_online()?;
        let rows = self.rows.lock().unwrap();
        let mut entries: Vec<SessionIndexEntry> = Vec::new();
        for m in rows.iter().filter(|m| m.role == MessageRole::User) {
            if entries.iter().all(|e| e.session_id != m.session_id) {
                entries.push(SessionIndexEntry {
                    session_id: m.session_id.clone(),
                    first_message: m.content.clone(),
                    first_created_at: m.created_at,
                });
            }
        }
        entries.sort_by(|a, b| a.session_id.cmp(&b.session_id));
        Ok(entries)
    }

    async fn delete(&self, session_id: &SessionId) -> Result<u64, StoreError> {
        self.check_online()?;
        let mut rows = self.rows.lock().unwrap();
        let before = rows.len();
        rows.retain(|m| &m.session_id != session_id);
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok((before - rows.len()) as u64)
    }

    async fn delete_all(&self) -> Result<u64, StoreError> {
        self.check_online()?;
        let mut rows = self.rows.lock().unwrap();
        let removed = rows.len() as u64;
        rows.clear();
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(removed)
    }
}

/// How a `MockBackend` answers.
pub enum MockReply {
    /// Echo the last prompt entry back, with `{"mock": true}` metadata.
    Echo,
    Fail(fn() -> BackendError),
    /// Sleep before echoing (to exercise the orchestrator timeout).
    Slow(Duration),
    Empty,
}

/// Scripted `ChatBackend` that records the prompts it receives.
pub struct MockBackend {
    reply: MockReply,
    pub requests: Mutex<Vec<ChatRequest>>,
    observed: Option<InMemoryStore>,
    /// Store row counts seen at each call when an observed store is attached.
    pub rows_at_call: Mutex<Vec<usize>>,
}

impl MockBackend {
    pub fn new(reply: MockReply) -> Self {
        Self {
            reply,
            requests: Mutex::new(Vec::new()),
            observed: None,
            rows_at_call: Mutex::new(Vec::new()),
        }
    }

    /// Record how many rows `store` holds whenever the backend is called.
    pub fn observing(mut self, store: InMemoryStore) -> Self {
        self.observed = Some(store);
        self
    }

    pub fn last_request(&self) -> Option<ChatRequest> {
        self.requests.lock().unwrap().last().cloned()
    }

    fn echo(request: &ChatRequest) -> ChatReply {
        let last = request
            .messages
            .last()
            .map(|m| m.content.clone())
            .unwrap_or_default();
        let mut metadata = serde_json::Map::new();
        metadata.insert("mock".to_string(), serde_json::Value::Bool(true));
        ChatReply {
            content: format!("echo: {last}"),
            metadata,
        }
    }
}

impl ChatBackend for MockBackend {
    fn name(&self) -> &str {
        "mock"
    }

    fn model(&self) -> &str {
        "mock-model"
    }

    async fn chat(&self, request: &ChatRequest) -> Result<ChatReply, BackendError> {
        self.requests.lock().unwrap().push(request.clone());
        if let Some(store) = &self.observed {
            self.rows_at_call.lock().unwrap().push(store.len());
        }
        match &self.reply {
            MockReply::Echo => Ok(Self::echo(request)),
            MockReply::Fail(make) => Err(make()),
            MockReply::Slow(delay) => {
                tokio::time::sleep(*delay).await;
                Ok(Self::echo(request))
            }
            MockReply::Empty => Ok(ChatReply::default()),
        }
    }
}
