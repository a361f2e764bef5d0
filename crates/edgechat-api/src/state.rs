//! Application state wiring the orchestrator to its concrete store and
//! backend.
//!
//! AppState is shared by CLI commands and REST handlers. The orchestrator
//! is generic over `MessageStore`/`ChatBackend`; AppState pins it to the
//! SQLite store and the Ollama backend.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;

use edgechat_core::chat::ChatSettings;
use edgechat_core::chat::orchestrator::ChatOrchestrator;
use edgechat_infra::config::ensure_data_dir;
use edgechat_infra::llm::OllamaBackend;
use edgechat_infra::sqlite::message::SqliteMessageStore;
use edgechat_infra::sqlite::pool::{DatabasePool, database_url};
use edgechat_types::config::ChatConfig;

/// Orchestrator pinned to the infra implementations.
pub type ConcreteOrchestrator = ChatOrchestrator<SqliteMessageStore, OllamaBackend>;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub orchestrator: Arc<ConcreteOrchestrator>,
    pub config: Arc<ChatConfig>,
    pub data_dir: PathBuf,
}

impl AppState {
    /// Open the database under `data_dir` and wire the orchestrator.
    pub async fn init(data_dir: PathBuf, config: ChatConfig) -> anyhow::Result<Self> {
        ensure_data_dir(&data_dir)
            .await
            .with_context(|| format!("failed to create data directory {}", data_dir.display()))?;

        let db_url = database_url(&data_dir, &config.store);
        let pool = DatabasePool::connect(&db_url, &config.store)
            .await
            .with_context(|| format!("failed to open message store at {db_url}"))?;

        let store = SqliteMessageStore::new(pool);
        let backend = OllamaBackend::from_config(&config.backend)?;
        let orchestrator = ChatOrchestrator::new(store, backend, ChatSettings::from_config(&config));

        tracing::info!(
            backend = %config.backend.base_url,
            model = %config.backend.model,
            history_limit = config.history.max_messages,
            "edgechat state initialized"
        );

        Ok(Self::from_parts(orchestrator, config, data_dir))
    }

    pub fn from_parts(orchestrator: ConcreteOrchestrator, config: ChatConfig, data_dir: PathBuf) -> Self {
        Self {
            orchestrator: Arc::new(orchestrator),
            config: Arc::new(config),
            data_dir,
        }
    }
}
