//! SQLite message store implementation.
//!
//! Implements `MessageStore` from `edgechat-core` over the
//! `conversation_history` table: raw queries, a private Row struct, and
//! split reader/writer pool usage.

use chrono::{DateTime, Utc};
use edgechat_core::store::MessageStore;
use edgechat_types::error::StoreError;
use edgechat_types::message::{MessageRole, StoredMessage};
use edgechat_types::session::{SessionId, SessionIndexEntry};
use sqlx::Row;

use super::pool::DatabasePool;

const MESSAGE_COLUMNS: &str = "id, session_id, role, content, created_at, metadata";

/// SQLite-backed implementation of `MessageStore`.
#[derive(Clone)]
pub struct SqliteMessageStore {
    pool: DatabasePool,
}

impl SqliteMessageStore {
    /// Create a new store backed by the given database pool.
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &DatabasePool {
        &self.pool
    }
}

// ---------------------------------------------------------------------------
// Private Row type for SQLite-to-domain mapping
// ---------------------------------------------------------------------------

struct MessageRow {
    id: i64,
    session_id: String,
    role: String,
    content: String,
    created_at: String,
    metadata: Option<String>,
}

impl MessageRow {
    fn from_row(row: &sqlx::sqlite::SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            session_id: row.try_get("session_id")?,
            role: row.try_get("role")?,
            content: row.try_get("content")?,
            created_at: row.try_get("created_at")?,
            metadata: row.try_get("metadata")?,
        })
    }

    fn into_message(self) -> Result<StoredMessage, StoreError> {
        let role: MessageRole = self
            .role
            .parse()
            .map_err(|e: StoreError| StoreError::Decode(e.to_string()))?;
        let created_at = parse_datetime(&self.created_at)?;

        Ok(StoredMessage {
            id: self.id,
            session_id: SessionId::from(self.session_id),
            role,
            content: self.content,
            created_at,
            metadata: self.metadata.map(decode_metadata),
        })
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn parse_datetime(s: &str) -> Result<DateTime<Utc>, StoreError> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| StoreError::Decode(format!("invalid datetime '{s}': {e}")))
}

/// Stored metadata that is not valid JSON comes back as a JSON string.
fn decode_metadata(text: String) -> serde_json::Value {
    serde_json::from_str(&text).unwrap_or(serde_json::Value::String(text))
}

fn map_sqlx(e: sqlx::Error) -> StoreError {
    match &e {
        sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed | sqlx::Error::Io(_) => {
            StoreError::Connection(e.to_string())
        }
        _ => StoreError::Query(e.to_string()),
    }
}

fn decode_rows(rows: &[sqlx::sqlite::SqliteRow]) -> Result<Vec<StoredMessage>, StoreError> {
    let mut messages = Vec::with_capacity(rows.len());
    for row in rows {
        let message_row = MessageRow::from_row(row).map_err(map_sqlx)?;
        messages.push(message_row.into_message()?);
    }
    Ok(messages)
}

// ---------------------------------------------------------------------------
// MessageStore implementation
// ---------------------------------------------------------------------------

impl MessageStore for SqliteMessageStore {
    async fn append(
        &self,
        session_id: &SessionId,
        role: MessageRole,
        content: &str,
        metadata: Option<&serde_json::Value>,
    ) -> Result<StoredMessage, StoreError> {
        let metadata = metadata
            .map(serde_json::to_string_pretty)
            .transpose()
            .map_err(|e| StoreError::Query(format!("unserializable metadata: {e}")))?;

        let sql = format!(
            "INSERT INTO conversation_history (session_id, role, content, metadata) \
             VALUES (?, ?, ?, ?) RETURNING {MESSAGE_COLUMNS}"
        );
        let row = sqlx::query(&sql)
            .bind(session_id.as_str())
            .bind(role.as_str())
            .bind(content)
            .bind(metadata)
            .fetch_one(&self.pool.writer)
            .await
            .map_err(map_sqlx)?;

        let message = MessageRow::from_row(&row).map_err(map_sqlx)?.into_message()?;
        tracing::debug!(
            session_id = %session_id,
            role = %role,
            id = message.id,
            "message appended"
        );
        Ok(message)
    }

    async fn fetch(
        &self,
        session_id: &SessionId,
        limit: Option<u32>,
    ) -> Result<Vec<StoredMessage>, StoreError> {
        // LIMIT -1 is unbounded in SQLite.
        let limit = limit.map(i64::from).unwrap_or(-1);
        let sql = format!(
            "SELECT {MESSAGE_COLUMNS} FROM conversation_history \
             WHERE session_id = ? ORDER BY created_at ASC, id ASC LIMIT ?"
        );
        let rows = sqlx::query(&sql)
            .bind(session_id.as_str())
            .bind(limit)
            .fetch_all(&self.pool.reader)
            .await
            .map_err(map_sqlx)?;

        decode_rows(&rows)
    }

    async fn list_sessions(&self) -> Result<Vec<SessionIndexEntry>, StoreError> {
        let rows = sqlx::query(
            r#"SELECT h.session_id, h.content, h.created_at
               FROM conversation_history h
               WHERE h.role = 'user'
                 AND h.id = (
                     SELECT f.id FROM conversation_history f
                     WHERE f.session_id = h.session_id AND f.role = 'user'
                     ORDER BY f.created_at ASC, f.id ASC
                     LIMIT 1
                 )
               ORDER BY h.session_id"#,
        )
        .fetch_all(&self.pool.reader)
        .await
        .map_err(map_sqlx)?;

        let mut entries = Vec::with_capacity(rows.len());
        for row in &rows {
            let session_id: String = row.try_get("session_id").map_err(map_sqlx)?;
            let first_message: String = row.try_get("content").map_err(map_sqlx)?;
            let created_at: String = row.try_get("created_at").map_err(map_sqlx)?;
            entries.push(SessionIndexEntry {
                session_id: SessionId::from(session_id),
                first_message,
                first_created_at: parse_datetime(&created_at)?,
            });
        }

        Ok(entries)
    }

    async fn delete(&self, session_id: &SessionId) -> Result<u64, StoreError> {
        let result = sqlx::query("DELETE FROM conversation_history WHERE session_id = ?")
            .bind(session_id.as_str())
            .execute(&self.pool.writer)
            .await
            .map_err(map_sqlx)?;

        tracing::debug!(
            session_id = %session_id,
            removed = result.rows_affected(),
            "session rows deleted"
        );
        Ok(result.rows_affected())
    }

    async fn delete_all(&self) -> Result<u64, StoreError> {
        let result = sqlx::query("DELETE FROM conversation_history")
            .execute(&self.pool.writer)
            .await
            .map_err(map_sqlx)?;

        tracing::debug!(removed = result.rows_affected(), "all rows deleted");
        Ok(result.rows_affected())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    async fn test_store() -> SqliteMessageStore {
        let dir = tempfile::tempdir().unwrap();
        let db_path = dir.path().join("test.db");
        let url = format!("sqlite://{}?mode=rwc", db_path.display());
        // Leak tempdir so it lives for the test
        std::mem::forget(dir);
        SqliteMessageStore::new(DatabasePool::new(&url).await.unwrap())
    }

    fn sid(s: &str) -> SessionId {
        SessionId::from(s)
    }

    #[tokio::test]
    async fn test_append_assigns_id_and_timestamp() {
        let store = test_store().await;
        let before = Utc::now() - chrono::Duration::seconds(1);

        let first = store
            .append(&sid("a"), MessageRole::User, "hello", None)
            .await
            .unwrap();
        let second = store
            .append(&sid("a"), MessageRole::Assistant, "hi", Some(&json!({"model": "m"})))
            .await
            .unwrap();

        assert!(second.id > first.id);
        assert!(first.created_at >= before);
        assert_eq!(first.metadata, None);
        assert_eq!(second.metadata, Some(json!({"model": "m"})));
        assert_eq!(second.role, MessageRole::Assistant);
    }

    #[tokio::test]
    async fn test_fetch_preserves_append_order() {
        let store = test_store().await;
        let id = sid("order");
        for (i, role) in [MessageRole::User, MessageRole::Assistant]
            .iter()
            .cycle()
            .take(6)
            .enumerate()
        {
            store.append(&id, *role, &format!("m{i}"), None).await.unwrap();
        }

        let messages = store.fetch(&id, None).await.unwrap();
        let contents: Vec<&str> = messages.iter().map(|m| m.content.as_str()).collect();
        assert_eq!(contents, vec!["m0", "m1", "m2", "m3", "m4", "m5"]);
    }

    #[tokio::test]
    async fn test_fetch_limit_returns_oldest_prefix() {
        let store = test_store().await;
        let id = sid("prefix");
        for i in 0..5 {
            store
                .append(&id, MessageRole::User, &format!("m{i}"), None)
                .await
                .unwrap();
        }

        let messages = store.fetch(&id, Some(2)).await.unwrap();
        let contents: Vec<&str> = messages.iter().map(|m| m.content.as_str()).collect();
        assert_eq!(contents, vec!["m0", "m1"]);
        assert!(store.fetch(&id, Some(0)).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_sessions_are_isolated() {
        let store = test_store().await;
        store.append(&sid("a"), MessageRole::User, "for a", None).await.unwrap();
        store.append(&sid("b"), MessageRole::User, "for b", None).await.unwrap();

        let a = store.fetch(&sid("a"), None).await.unwrap();
        assert_eq!(a.len(), 1);
        assert_eq!(a[0].content, "for a");
        assert!(store.fetch(&sid("missing"), None).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_list_sessions_uses_earliest_user_message() {
        let store = test_store().await;
        store.append(&sid("b"), MessageRole::Assistant, "greeting", None).await.unwrap();
        store.append(&sid("b"), MessageRole::User, "first b", None).await.unwrap();
        store.append(&sid("b"), MessageRole::User, "second b", None).await.unwrap();
        store.append(&sid("a"), MessageRole::User, "first a", None).await.unwrap();
        // No user message: not listed.
        store.append(&sid("c"), MessageRole::Assistant, "orphan", None).await.unwrap();

        let entries = store.list_sessions().await.unwrap();
        let view: Vec<(&str, &str)> = entries
            .iter()
            .map(|e| (e.session_id.as_str(), e.first_message.as_str()))
            .collect();
        assert_eq!(view, vec![("a", "first a"), ("b", "first b")]);
    }

    #[tokio::test]
    async fn test_delete_is_scoped_and_idempotent() {
        let store = test_store().await;
        store.append(&sid("a"), MessageRole::User, "x", None).await.unwrap();
        store.append(&sid("a"), MessageRole::Assistant, "y", None).await.unwrap();
        store.append(&sid("b"), MessageRole::User, "z", None).await.unwrap();

        assert_eq!(store.delete(&sid("a")).await.unwrap(), 2);
        assert_eq!(store.delete(&sid("a")).await.unwrap(), 0);
        assert!(store.fetch(&sid("a"), None).await.unwrap().is_empty());
        assert_eq!(store.fetch(&sid("b"), None).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_delete_all_twice() {
        let store = test_store().await;
        store.append(&sid("a"), MessageRole::User, "x", None).await.unwrap();
        store.append(&sid("b"), MessageRole::User, "y", None).await.unwrap();

        assert_eq!(store.delete_all().await.unwrap(), 2);
        assert_eq!(store.delete_all().await.unwrap(), 0);
        assert!(store.list_sessions().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_role_constraint_rejects_unknown_role() {
        let store = test_store().await;
        let result = sqlx::query(
            "INSERT INTO conversation_history (session_id, role, content) VALUES ('s', 'tool', 'x')",
        )
        .execute(&store.pool().writer)
        .await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_non_json_metadata_reads_back_as_string() {
        let store = test_store().await;
        sqlx::query(
            "INSERT INTO conversation_history (session_id, role, content, metadata) VALUES ('s', 'assistant', 'x', 'not json')",
        )
        .execute(&store.pool().writer)
        .await
        .unwrap();

        let messages = store.fetch(&sid("s"), None).await.unwrap();
        assert_eq!(messages[0].metadata, Some(json!("not json")));
    }

    #[tokio::test]
    async fn test_concurrent_appends_are_all_stored() {
        let store = test_store().await;
        let mut handles = Vec::new();
        for i in 0..16 {
            let store = store.clone();
            handles.push(tokio::spawn(async move {
                store
                    .append(&SessionId::from("shared"), MessageRole::User, &format!("m{i}"), None)
                    .await
                    .unwrap()
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }

        let messages = store.fetch(&sid("shared"), None).await.unwrap();
        assert_eq!(messages.len(), 16);
        let mut ids: Vec<i64> = messages.iter().map(|m| m.id).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), 16);
    }

    #[tokio::test]
    async fn test_concurrent_sessions_stay_isolated_and_ordered() {
        let store = test_store().await;
        let sessions: Vec<String> = (0..4).map(|s| format!("session-{s}")).collect();

        let mut handles = Vec::new();
        for session in &sessions {
            let store = store.clone();
            let session = sid(session);
            handles.push(tokio::spawn(async move {
                for i in 0..8 {
                    let role = if i % 2 == 0 {
                        MessageRole::User
                    } else {
                        MessageRole::Assistant
                    };
                    store
                        .append(&session, role, &format!("{session}/m{i}"), None)
                        .await
                        .unwrap();
                }
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }

        for session in &sessions {
            let messages = store.fetch(&sid(session), None).await.unwrap();
            assert!(messages.iter().all(|m| m.session_id.as_str() == session));
            let contents: Vec<&str> = messages.iter().map(|m| m.content.as_str()).collect();
            let expected: Vec<String> = (0..8).map(|i| format!("{session}/m{i}")).collect();
            assert_eq!(contents, expected);
        }

        let index = store.list_sessions().await.unwrap();
        assert_eq!(index.len(), 4);
        for entry in &index {
            assert_eq!(entry.first_message, format!("{}/m0", entry.session_id));
        }
    }
}
