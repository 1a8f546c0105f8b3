//! Composite prompt construction shared by the HTTP and WebSocket handlers.

use crate::models::ChatTurn;

/// Only this many of the most recent turns are forwarded to the agent.
pub const MAX_HISTORY_TURNS: usize = 5;

/// The most recent `MAX_HISTORY_TURNS` turns, oldest first.
pub fn recent_history(history: &[ChatTurn]) -> &[ChatTurn] {
    &history[history.len().saturating_sub(MAX_HISTORY_TURNS)..]
}

/// Builds the query sent to the agent.
///
/// Without history the message is returned verbatim. Otherwise the recent
/// turns are rendered as `role: content` lines ahead of the new question.
pub fn compose_query(message: &str, history: &[ChatTurn]) -> String {
    let recent = recent_history(history);
    if recent.is_empty() {
        return message.to_string();
    }

    let context = recent
        .iter()
        .map(|turn| format!("{}: {}", turn.role, turn.content))
        .collect::<Vec<_>>()
        .join("\n");

    format!("Context from previous messages:\n{context}\n\nNew question: {message}")
}
