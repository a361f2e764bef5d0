//! CLI command definitions for the `edgechat` binary.
//!
//! Uses clap derive macros for argument parsing. Every command shares the
//! orchestrator with the REST API, so the CLI and the server see the same
//! conversation log.

pub mod chat;
pub mod session;

use clap::{Parser, Subcommand};
use clap_complete::Shell;

/// Chat with a local model and keep the conversation history.
#[derive(Parser)]
#[command(name = "edgechat", version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output machine-readable JSON instead of styled text.
    #[arg(long, global = true)]
    pub json: bool,

    /// Suppress all output except errors.
    #[arg(long, global = true)]
    pub quiet: bool,

    /// Detailed output (-v for info, -vv for debug, -vvv for trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Emit logs as JSON lines.
    #[arg(long, global = true)]
    pub log_json: bool,

    /// Export tracing spans to stdout via OpenTelemetry.
    #[arg(long, global = true)]
    pub otel: bool,

    /// Override the model name.
    #[arg(long, global = true)]
    pub model: Option<String>,

    /// Override the Ollama base URL.
    #[arg(long, global = true)]
    pub ollama_url: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the REST API server.
    Serve {
        /// Port to listen on (defaults to config / PORT).
        #[arg(short, long)]
        port: Option<u16>,

        /// Host to bind to (defaults to config / EDGECHAT_HOST).
        #[arg(long)]
        host: Option<String>,
    },

    /// Send one message and print the reply.
    Send {
        /// Message text.
        message: String,

        /// Session to continue (a new one is started when omitted).
        #[arg(short, long, value_parser = session_id_arg)]
        session: Option<String>,
    },

    /// Show the conversation of a session.
    History {
        /// Session ID.
        #[arg(value_parser = session_id_arg)]
        session: String,

        /// Show the raw message log instead of paired turns.
        #[arg(long)]
        raw: bool,

        /// Only the oldest N messages.
        #[arg(short, long)]
        limit: Option<u32>,
    },

    /// List sessions with their first message.
    #[command(alias = "ls")]
    Sessions,

    /// Allocate a new session ID.
    #[command(name = "new-session")]
    NewSession,

    /// Delete conversation history.
    #[command(alias = "rm")]
    Delete {
        #[command(subcommand)]
        resource: DeleteResource,
    },

    /// Generate shell completions.
    Completions {
        /// Shell to generate completions for.
        shell: Shell,
    },
}

#[derive(Subcommand)]
pub enum DeleteResource {
    /// Delete every message of one session.
    Session {
        /// Session ID to delete.
        #[arg(value_parser = session_id_arg)]
        id: String,

        /// Skip confirmation prompt.
        #[arg(long)]
        force: bool,
    },

    /// Delete every session.
    All {
        /// Skip confirmation prompt.
        #[arg(long)]
        force: bool,
    },
}

/// Session ids given on the command line must not be blank.
fn session_id_arg(s: &str) -> Result<String, String> {
    if s.trim().is_empty() {
        return Err("session id must not be empty".to_string());
    }
    Ok(s.to_string())
}
