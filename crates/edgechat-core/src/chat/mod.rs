//! Chat turn orchestration.
//!
//! [`orchestrator::ChatOrchestrator`] drives one user turn end to end:
//! bounded history fetch, prompt assembly, persistence of both sides of
//! the exchange, and the backend round trip.

pub mod orchestrator;

use std::time::Duration;

use edgechat_types::config::ChatConfig;

/// Settings the orchestrator needs from configuration.
#[derive(Debug, Clone)]
pub struct ChatSettings {
    pub system_prompt: String,
    /// Maximum number of stored messages replayed into a prompt.
    pub history_limit: u32,
    /// Ceiling for one backend round trip; exceeding it counts as a
    /// backend failure.
    pub request_timeout: Duration,
}

impl ChatSettings {
    pub fn from_config(config: &ChatConfig) -> Self {
        Self {
            system_prompt: config.backend.system_prompt.clone(),
            history_limit: config.history.max_messages,
            request_timeout: Duration::from_secs(config.backend.timeout_secs),
        }
    }
}

impl Default for ChatSettings {
    fn default() -> Self {
        Self::from_config(&ChatConfig::default())
    }
}
