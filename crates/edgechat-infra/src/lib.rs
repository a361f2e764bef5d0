//! Infrastructure layer for edgechat.
//!
//! Contains implementations of the traits defined in `edgechat-core`:
//! the SQLite message store and the Ollama chat backend, plus the
//! configuration loader (config file + environment).

pub mod config;
pub mod llm;
pub mod sqlite;
