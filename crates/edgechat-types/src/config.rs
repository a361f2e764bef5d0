//! Configuration types for edgechat.
//!
//! `ChatConfig` represents `config.toml` in the data directory. Every field
//! has a default so an empty (or missing) file yields a runnable setup;
//! environment variables are layered on top by the infra config loader.

use serde::{Deserialize, Serialize};

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChatConfig {
    pub backend: BackendConfig,
    pub history: HistoryConfig,
    pub store: StoreConfig,
    pub server: ServerConfig,
}

/// Language-model backend settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BackendConfig {
    /// Base URL of the Ollama-compatible server (no trailing `/api/chat`).
    pub base_url: String,
    pub model: String,
    pub system_prompt: String,
    /// Ceiling for a single backend round trip.
    pub timeout_secs: u64,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            base_url: "http://ollama:11434".to_string(),
            model: "PetrosStav/gemma3-tools:4b".to_string(),
            system_prompt: "You are a helpful AI assistant running on a Jetson edge device."
                .to_string(),
            timeout_secs: 180,
        }
    }
}

/// History replay settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HistoryConfig {
    /// Maximum number of stored messages replayed into a prompt. The
    /// oldest messages of the session are used (prefix, not suffix).
    pub max_messages: u32,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self { max_messages: 40 }
    }
}

/// Message store connection settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Database file stem inside the data directory (`{database}.db`).
    pub database: String,
    /// Full connection URL; overrides `database` when set.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    pub busy_timeout_secs: u64,
    pub max_readers: u32,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            database: "ollama_memory".to_string(),
            url: None,
            busy_timeout_secs: 5,
            max_readers: 8,
        }
    }
}

/// HTTP listener settings for the display-layer API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 7861,
        }
    }
}
