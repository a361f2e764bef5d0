//! Session management CLI commands: list, new, delete.
//!
//! Session browsing with a comfy-table listing and deletion with a
//! confirmation prompt.

use anyhow::Result;
use comfy_table::{Cell, Color, ContentArrangement, Table, presets};
use console::style;
use dialoguer::Confirm;

use edgechat_types::session::{SessionId, SessionIndexEntry};

use crate::state::AppState;

/// List sessions with their first user message.
///
/// # Examples
///
/// ```bash
/// edgechat sessions
/// edgechat sessions --json
/// ```
pub async fn list_sessions(state: &AppState, json: bool) -> Result<()> {
    let entries = state.orchestrator.session_index().await?;

    if json {
        let listing: Vec<serde_json::Value> = entries
            .iter()
            .map(|e| {
                serde_json::json!({
                    "session_id": e.session_id,
                    "label": e.label(),
                    "first_message": e.first_message,
                    "first_created_at": e.first_created_at,
                })
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&listing)?);
        return Ok(());
    }

    if entries.is_empty() {
        println!();
        println!(
            "  {} No sessions yet. Start one with: {}",
            style("i").blue().bold(),
            style("edgechat send \"hello\"").yellow()
        );
        println!();
        return Ok(());
    }

    let mut table = Table::new();
    table.load_preset(presets::UTF8_FULL_CONDENSED);
    table.set_content_arrangement(ContentArrangement::Dynamic);

    table.set_header(vec![
        Cell::new("Session").fg(Color::White),
        Cell::new("Label").fg(Color::White),
    ]);

    for entry in &entries {
        let [id, label] = listing_row(entry);
        table.add_row(vec![Cell::new(id).fg(Color::Cyan), Cell::new(label)]);
    }

    println!();
    println!("{table}");
    println!();
    println!(
        "  {} session{}",
        style(entries.len()).bold(),
        if entries.len() == 1 { "" } else { "s" }
    );
    println!();

    Ok(())
}

/// Id and label columns of one listing row; the label is the same one
/// the HTTP index serves.
fn listing_row(entry: &SessionIndexEntry) -> [String; 2] {
    [entry.session_id.to_string(), entry.label()]
}

/// Print a freshly allocated session id. Nothing is stored until the
/// first message is sent.
pub fn new_session(state: &AppState, json: bool) {
    let session_id = state.orchestrator.start_session();
    if json {
        println!("{}", serde_json::json!({ "session_id": session_id }));
    } else {
        println!("{session_id}");
    }
}

/// Delete one session with confirmation.
///
/// # Examples
///
/// ```bash
/// edgechat delete session <session-id>
/// edgechat delete session <session-id> --force
/// ```
pub async fn delete_session(state: &AppState, id: &str, force: bool, json: bool) -> Result<()> {
    let session_id = SessionId::from(id);

    if !force && !json {
        let count = state.orchestrator.messages(&session_id, None).await?.len();
        let confirmed = Confirm::new()
            .with_prompt(format!(
                "Delete session '{}' ({} messages)?",
                style(&session_id).red().bold(),
                count
            ))
            .default(false)
            .interact()?;

        if !confirmed {
            println!("  Cancelled.");
            return Ok(());
        }
    }

    let fresh = state.orchestrator.delete_session(&session_id).await?;

    if json {
        println!(
            "{}",
            serde_json::json!({"deleted": true, "deleted_session": session_id, "session_id": fresh})
        );
    } else {
        println!("  {} Session '{}' deleted.", style("x").red().bold(), session_id);
        println!("  {} New session: {}", style("i").blue().bold(), style(fresh).cyan());
    }

    Ok(())
}

/// Delete every session with confirmation.
pub async fn delete_all(state: &AppState, force: bool, json: bool) -> Result<()> {
    if !force && !json {
        let count = state.orchestrator.session_index().await?.len();
        let confirmed = Confirm::new()
            .with_prompt(format!(
                "Delete {} of conversation history?",
                style(format!("all {count} sessions")).red().bold()
            ))
            .default(false)
            .interact()?;

        if !confirmed {
            println!("  Cancelled.");
            return Ok(());
        }
    }

    let fresh = state.orchestrator.delete_all_sessions().await?;

    if json {
        println!("{}", serde_json::json!({"deleted": true, "session_id": fresh}));
    } else {
        println!("  {} All sessions deleted.", style("x").red().bold());
        println!("  {} New session: {}", style("i").blue().bold(), style(fresh).cyan());
    }

    Ok(())
}
