//! API Models
//!
//! Request and response bodies for the HTTP endpoints. The same `ChatTurn`
//! shape is reused by the WebSocket protocol.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use utoipa::ToSchema;

/// One earlier message of the conversation, supplied by the client.
#[derive(Serialize, Deserialize, ToSchema, Debug, Clone, PartialEq, Eq)]
pub struct ChatTurn {
    /// Free-form speaker label, usually "user" or "assistant".
    #[schema(example = "user")]
    pub role: String,
    #[schema(example = "Who maintains the tokio crate?")]
    pub content: String,
}

impl ChatTurn {
    pub fn new(role: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            role: role.into(),
            content: content.into(),
        }
    }
}

#[derive(Deserialize, ToSchema, Debug, Clone)]
pub struct ChatRequest {
    #[schema(example = "And which company sponsors it?")]
    pub message: String,
    /// Earlier turns, oldest first. Absent and `null` both mean no history.
    #[serde(default)]
    pub history: Option<Vec<ChatTurn>>,
}

impl ChatRequest {
    pub fn history(&self) -> &[ChatTurn] {
        self.history.as_deref().unwrap_or_default()
    }
}

/// An opaque provenance record. No agent currently reports any.
pub type Source = Map<String, Value>;

#[derive(Serialize, ToSchema, Debug, Clone)]
pub struct ChatResponse {
    pub answer: String,
    #[schema(value_type = Vec<Object>)]
    pub sources: Vec<Source>,
}

impl ChatResponse {
    /// An answer without provenance.
    pub fn answer(answer: impl Into<String>) -> Self {
        Self {
            answer: answer.into(),
            sources: Vec::new(),
        }
    }
}

#[derive(Serialize, ToSchema, Debug, Clone)]
pub struct WelcomeResponse {
    #[schema(example = "Welcome to Mind Search API")]
    pub message: String,
}

#[derive(Serialize, ToSchema, Debug)]
pub struct ErrorResponse {
    pub detail: String,
}
