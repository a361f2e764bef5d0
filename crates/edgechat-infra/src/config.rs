//! Configuration loader for edgechat.
//!
//! Resolves the data directory, reads `config.toml` from it, and layers
//! environment variables on top. Falls back to defaults when the file is
//! missing or malformed, so no configuration is required to run.

use std::path::{Path, PathBuf};
use std::str::FromStr;

use edgechat_types::config::ChatConfig;

/// Resolve the data directory.
///
/// Uses `EDGECHAT_DATA_DIR` if set, otherwise `~/.edgechat`.
pub fn resolve_data_dir() -> PathBuf {
    if let Ok(dir) = std::env::var("EDGECHAT_DATA_DIR") {
        return PathBuf::from(dir);
    }

    if let Some(home) = dirs::home_dir() {
        return home.join(".edgechat");
    }

    // Last resort: current directory
    PathBuf::from(".edgechat")
}

/// Create the data directory if it does not exist yet.
pub async fn ensure_data_dir(data_dir: &Path) -> std::io::Result<()> {
    tokio::fs::create_dir_all(data_dir).await
}

/// Load `{data_dir}/config.toml`.
///
/// - Missing file: [`ChatConfig::default()`].
/// - Unreadable or unparseable file: logs a warning and returns the default.
pub async fn load_config_file(data_dir: &Path) -> ChatConfig {
    let config_path = data_dir.join("config.toml");

    let content = match tokio::fs::read_to_string(&config_path).await {
        Ok(content) => content,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!("No config.toml found at {}, using defaults", config_path.display());
            return ChatConfig::default();
        }
        Err(err) => {
            tracing::warn!("Failed to read {}: {err}, using defaults", config_path.display());
            return ChatConfig::default();
        }
    };

    match toml::from_str::<ChatConfig>(&content) {
        Ok(config) => config,
        Err(err) => {
            tracing::warn!(
                "Failed to parse {}: {err}, using defaults",
                config_path.display()
            );
            ChatConfig::default()
        }
    }
}

/// Load the effective configuration: file, then process environment.
pub async fn load_config(data_dir: &Path) -> ChatConfig {
    let mut config = load_config_file(data_dir).await;
    apply_env_overrides(&mut config, |key| std::env::var(key).ok());
    config
}

/// Overlay environment variables onto `config`.
///
/// `lookup` returns the value of a variable; empty values count as unset.
/// Numeric variables that fail to parse are logged and ignored.
pub fn apply_env_overrides(config: &mut ChatConfig, lookup: impl Fn(&str) -> Option<String>) {
    let get = |key: &str| lookup(key).filter(|v| !v.is_empty());

    if let Some(v) = get("OLLAMA_BASE_URL") {
        config.backend.base_url = v;
    }
    if let Some(v) = get("OLLAMA_MODEL") {
        config.backend.model = v;
    }
    if let Some(v) = get("OLLAMA_SYSTEM_PROMPT") {
        config.backend.system_prompt = v;
    }
    if let Some(v) = parse_env(&get, "OLLAMA_TIMEOUT_SECS") {
        config.backend.timeout_secs = v;
    }
    if let Some(v) = parse_env(&get, "OLLAMA_UI_MAX_HISTORY") {
        config.history.max_messages = v;
    }
    if let Some(v) = get("EDGECHAT_DB") {
        config.store.database = v;
    }
    if let Some(v) = get("DATABASE_URL") {
        config.store.url = Some(v);
    }
    if let Some(v) = parse_env(&get, "EDGECHAT_DB_BUSY_TIMEOUT") {
        config.store.busy_timeout_secs = v;
    }
    if let Some(v) = parse_env(&get, "EDGECHAT_DB_MAX_READERS") {
        config.store.max_readers = v;
    }
    if let Some(v) = get("EDGECHAT_HOST") {
        config.server.host = v;
    }
    // PORT takes precedence over the legacy OLLAMA_UI_PORT.
    if let Some(v) = parse_env(&get, "OLLAMA_UI_PORT") {
        config.server.port = v;
    }
    if let Some(v) = parse_env(&get, "PORT") {
        config.server.port = v;
    }
}

fn parse_env<T: FromStr>(get: &impl Fn(&str) -> Option<String>, key: &str) -> Option<T> {
    let raw = get(key)?;
    match raw.trim().parse() {
        Ok(value) => Some(value),
        Err(_) => {
            tracing::warn!(key, value = %raw, "ignoring unparseable environment value");
            None
        }
    }
}
