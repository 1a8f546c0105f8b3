//! Defines the WebSocket message protocol between the browser client and the API server.

use crate::models::{ChatTurn, Source};
use serde::{Deserialize, Serialize};

/// A query sent by the client (browser).
#[derive(Deserialize, Debug, Clone)]
pub struct ClientMessage {
    pub message: String,
    /// Earlier turns, oldest first.
    #[serde(default)]
    pub history: Option<Vec<ChatTurn>>,
}

impl ClientMessage {
    pub fn parse(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }

    pub fn history(&self) -> &[ChatTurn] {
        self.history.as_deref().unwrap_or_default()
    }
}

/// Frames sent from the server to the client.
///
/// Each query produces zero or more `Chunk` frames followed by exactly one
/// terminal frame (`Complete` or `Error`).
#[derive(Serialize, Debug, Clone, PartialEq)]
#[cfg_attr(test, derive(Deserialize))]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StreamFrame {
    /// Partial or placeholder content.
    Chunk { content: String },
    /// The final answer.
    Complete {
        content: String,
        sources: Vec<Source>,
    },
    /// Reports a failure for the current query.
    Error { content: String },
}

impl StreamFrame {
    pub fn chunk(content: impl Into<String>) -> Self {
        StreamFrame::Chunk {
            content: content.into(),
        }
    }

    pub fn complete(content: impl Into<String>) -> Self {
        StreamFrame::Complete {
            content: content.into(),
            sources: Vec::new(),
        }
    }

    pub fn error(content: impl Into<String>) -> Self {
        StreamFrame::Error {
            content: content.into(),
        }
    }
}
