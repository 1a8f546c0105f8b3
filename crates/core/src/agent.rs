//! Agent Client
//!
//! The research agent is an external collaborator: it plans, calls its own
//! tools (web search, page fetch) and eventually produces an answer. This
//! module models it as a single capability, `invoke(query)`, so that the web
//! handlers never depend on how the answer is produced.

use async_openai::error::OpenAIError;
use async_trait::async_trait;
use serde_json::Value;

/// Failures raised while asking the agent for an answer.
#[derive(Debug, thiserror::Error)]
pub enum AgentError {
    /// The LLM gateway rejected or failed the request.
    #[error("{0}")]
    Gateway(#[from] OpenAIError),
    /// A credential required to reach the gateway was not configured.
    #[error("Missing agent credential: {0}")]
    MissingCredential(&'static str),
    /// Any other failure reported by the agent.
    #[error("{0}")]
    Failed(String),
}

/// The raw answer of an agent run.
///
/// Most runs end with a plain string, but an agent may also finish with a list
/// of values (for instance several search hits).
#[derive(Debug, Clone, PartialEq)]
pub enum AgentOutput {
    Text(String),
    List(Vec<Value>),
}

impl AgentOutput {
    /// Flattens the answer into display text.
    ///
    /// Lists are rendered as their compact JSON array text. This is lossy:
    /// callers that need the individual items should match on the variant.
    pub fn into_text(self) -> String {
        match self {
            AgentOutput::Text(text) => text,
            AgentOutput::List(items) => Value::Array(items).to_string(),
        }
    }
}

impl From<String> for AgentOutput {
    fn from(text: String) -> Self {
        AgentOutput::Text(text)
    }
}

impl From<&str> for AgentOutput {
    fn from(text: &str) -> Self {
        AgentOutput::Text(text.to_string())
    }
}

/// Anything that can answer a natural-language query.
///
/// Each call is a complete agent run. Implementations may take arbitrarily
/// long and may return different answers for the same query.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AgentClient: Send + Sync {
    /// Runs the agent once on `query` and returns its final answer.
    async fn invoke(&self, query: &str) -> Result<AgentOutput, AgentError>;
}
