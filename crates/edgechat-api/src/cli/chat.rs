//! Chat CLI commands: send a message, show a session's history.

use anyhow::Result;
use comfy_table::{Cell, Color, ContentArrangement, Table, presets};
use console::style;

use edgechat_core::history::to_turns;
use edgechat_types::message::{MessageRole, TurnPair};
use edgechat_types::session::SessionId;

use crate::state::AppState;

/// Send one message through the orchestrator and print the latest turn.
///
/// # Examples
///
/// ```bash
/// edgechat send "hello"
/// edgechat send "and then?" --session <session-id>
/// ```
pub async fn send(state: &AppState, message: &str, session: Option<String>, json: bool) -> Result<()> {
    let session_id = match session {
        Some(id) => SessionId::from(id),
        None => state.orchestrator.start_session(),
    };

    let outcome = state.orchestrator.handle_turn(&session_id, message).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&outcome)?);
        return Ok(());
    }

    println!();
    println!("  {} {}", style("Session").dim(), style(&outcome.session_id).cyan());
    println!();

    match outcome.turns.last() {
        Some(turn) if !message.is_empty() => print_turn(turn),
        _ => println!("  {} Nothing sent.", style("i").blue().bold()),
    }

    if !outcome.metadata.is_empty() {
        println!();
        println!("  {}", style("Metadata").dim());
        for line in outcome.metadata_json().lines() {
            println!("  {}", style(line).dim());
        }
    }
    println!();

    Ok(())
}

/// Print a session as paired turns (default) or as the raw message log.
///
/// # Examples
///
/// ```bash
/// edgechat history <session-id>
/// edgechat history <session-id> --raw --limit 10
/// ```
pub async fn history(
    state: &AppState,
    session: &str,
    raw: bool,
    limit: Option<u32>,
    json: bool,
) -> Result<()> {
    let session_id = SessionId::from(session);

    if raw {
        let messages = state.orchestrator.messages(&session_id, limit).await?;
        if json {
            println!("{}", serde_json::to_string_pretty(&messages)?);
            return Ok(());
        }
        if messages.is_empty() {
            print_empty(&session_id);
            return Ok(());
        }

        let mut table = Table::new();
        table.load_preset(presets::UTF8_FULL_CONDENSED);
        table.set_content_arrangement(ContentArrangement::Dynamic);
        table.set_header(vec![
            Cell::new("ID").fg(Color::White),
            Cell::new("Role").fg(Color::White),
            Cell::new("Created").fg(Color::White),
            Cell::new("Content").fg(Color::White),
        ]);
        for message in &messages {
            let role_color = match message.role {
                MessageRole::User => Color::Cyan,
                MessageRole::Assistant => Color::Green,
                MessageRole::System => Color::DarkGrey,
            };
            table.add_row(vec![
                Cell::new(message.id.to_string()).fg(Color::DarkGrey),
                Cell::new(message.role.as_str()).fg(role_color),
                Cell::new(message.created_at.format("%Y-%m-%d %H:%M:%S").to_string()),
                Cell::new(&message.content),
            ]);
        }

        println!();
        println!("{table}");
        println!();
        return Ok(());
    }

    let turns = match limit {
        Some(limit) => to_turns(&state.orchestrator.messages(&session_id, Some(limit)).await?),
        None => state.orchestrator.load_turns(&session_id).await?,
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&turns)?);
        return Ok(());
    }
    if turns.is_empty() {
        print_empty(&session_id);
        return Ok(());
    }

    println!();
    for turn in &turns {
        print_turn(turn);
        println!();
    }

    Ok(())
}

fn print_turn(turn: &TurnPair) {
    println!("  {} {}", style("You:").cyan().bold(), turn.user);
    let label = style("Assistant:").green().bold();
    if turn.is_pending() {
        println!("  {label} {}", style("(no reply)").dim());
    } else if turn.assistant.starts_with("Error: ") {
        println!("  {label} {}", style(&turn.assistant).red());
    } else {
        println!("  {label} {}", turn.assistant);
    }
}

fn print_empty(session_id: &SessionId) {
    println!();
    println!(
        "  {} No messages in session '{}'. Start one with: {}",
        style("i").blue().bold(),
        style(session_id).cyan(),
        style(format!("edgechat send \"...\" --session {session_id}")).yellow()
    );
    println!();
}
