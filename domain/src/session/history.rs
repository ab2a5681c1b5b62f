//! Conversation history formatting.

use super::entities::{Message, Role};

/// Rendered in place of an empty history.
pub const NO_HISTORY: &str = "No prior conversation history.";

/// One line per message: `User: ..` or `Assistant (actor): ..`.
pub fn format_history(history: &[Message]) -> String {
    if history.is_empty() {
        return NO_HISTORY.to_string();
    }

    history
        .iter()
        .map(|message| match (message.role, &message.actor_name) {
            (Role::User, _) => format!("User: {}", message.content),
            (Role::Assistant, Some(actor)) => {
                format!("Assistant ({}): {}", actor, message.content)
            }
            (Role::Assistant, None) => format!("Assistant: {}", message.content),
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Prefix the current message with labelled history; unchanged when empty.
pub fn with_history(history: &[Message], message: &str) -> String {
    if history.is_empty() {
        return message.to_string();
    }
    format!(
        "=== Conversation history ===\n{}\n\n=== Current message ===\n{}",
        format_history(history),
        message
    )
}
