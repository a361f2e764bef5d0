//! History reconstruction.
//!
//! Turns the flat, ordered message log of a session into:
//! - a prompt for the backend ([`to_prompt`]), and
//! - the paired-turn view shown to the user ([`to_turns`]).
//!
//! Both are pure functions. Bounding the history is the store's job
//! (`MessageStore::fetch` with a limit); nothing here truncates.

use edgechat_types::llm::PromptMessage;
use edgechat_types::message::{MessageRole, StoredMessage, TurnPair};

/// Build the backend prompt for a new user message.
///
/// Layout: one system entry, then every history message with its role
/// and order preserved, then the new user message. The result always has
/// `history.len() + 2` entries.
pub fn to_prompt(
    history: &[StoredMessage],
    new_user_text: &str,
    system_prompt: &str,
) -> Vec<PromptMessage> {
    let mut messages = Vec::with_capacity(history.len() + 2);
    messages.push(PromptMessage::new(MessageRole::System, system_prompt));
    messages.extend(
        history
            .iter()
            .map(|m| PromptMessage::new(m.role, m.content.clone())),
    );
    messages.push(PromptMessage::new(MessageRole::User, new_user_text));
    messages
}

/// Pair user messages with the assistant replies that follow them.
///
/// - A user message becomes the pending left side of a pair.
/// - The next assistant message completes the pair and emits it.
/// - If several user messages arrive before a reply, only the last one is
///   paired; the earlier ones stay in the log but not in this view.
/// - A trailing user message with no reply is emitted as a pending pair.
/// - An assistant message with no pending user message is skipped.
/// - System messages are skipped.
pub fn to_turns(history: &[StoredMessage]) -> Vec<TurnPair> {
    let mut turns = Vec::with_capacity(history.len() / 2 + 1);
    let mut pending_user: Option<&str> = None;

    for message in history {
        match message.role {
            MessageRole::User => pending_user = Some(message.content.as_str()),
            MessageRole::Assistant => {
                if let Some(user) = pending_user.take() {
                    turns.push(TurnPair::new(user, message.content.clone()));
                }
            }
            MessageRole::System => {}
        }
    }

    if let Some(user) = pending_user {
        turns.push(TurnPair::pending(user));
    }

    turns
}
