use crate::agent::{AgentClient, AgentError, AgentOutput};
use async_openai::{
    Client,
    config::OpenAIConfig,
    types::{
        ChatCompletionRequestSystemMessageArgs, ChatCompletionRequestUserMessageArgs,
        CreateChatCompletionRequestArgs, CreateChatCompletionResponse,
    },
};
use async_trait::async_trait;
use tracing::{debug, warn};

/// Instructions sent ahead of every query.
const SYSTEM_PROMPT: &str = "You are Mind Search, a research assistant. \
Answer the user's question accurately and concisely. When earlier messages \
are provided as context, use them to resolve references in the new question.";

/// Routing prefixes understood by LLM proxies but not by the gateway itself.
const ROUTING_PREFIXES: &[&str] = &["openai/"];

/// Everything needed to reach an OpenAI-compatible gateway.
#[derive(Clone, Debug)]
pub struct GatewaySettings {
    /// Model identifier, optionally carrying a routing prefix (`openai/...`).
    pub model_id: String,
    pub api_base: Option<String>,
    pub api_key: Option<String>,
    /// Context window of the model, in tokens.
    pub context_window: u32,
}

/// Strips a proxy routing prefix from a model identifier.
///
/// `openai/Qwen/Qwen2.5-32B-Instruct` is served by the gateway as
/// `Qwen/Qwen2.5-32B-Instruct`.
pub fn gateway_model(model_id: &str) -> &str {
    ROUTING_PREFIXES
        .iter()
        .find_map(|prefix| model_id.strip_prefix(prefix))
        .unwrap_or(model_id)
}

/// Rough token estimate used only for context-window warnings.
fn estimated_tokens(text: &str) -> usize {
    text.chars().count().div_ceil(4)
}

/// An `AgentClient` that answers each query with one chat completion against
/// an OpenAI-compatible gateway.
pub struct GatewayAgent {
    client: Client<OpenAIConfig>,
    model: String,
    context_window: u32,
}

impl GatewayAgent {
    /// Creates a new gateway agent.
    ///
    /// Fails with `AgentError::MissingCredential` when the base URL or the API
    /// key is absent or empty. No request is made at construction time.
    pub fn new(settings: &GatewaySettings) -> Result<Self, AgentError> {
        let api_base = settings
            .api_base
            .as_deref()
            .filter(|v| !v.trim().is_empty())
            .ok_or(AgentError::MissingCredential("gateway base URL"))?;
        let api_key = settings
            .api_key
            .as_deref()
            .filter(|v| !v.trim().is_empty())
            .ok_or(AgentError::MissingCredential("gateway API key"))?;

        let config = OpenAIConfig::new()
            .with_api_key(api_key)
            .with_api_base(api_base);

        Ok(Self {
            client: Client::with_config(config),
            model: gateway_model(&settings.model_id).to_string(),
            context_window: settings.context_window,
        })
    }

    /// The model name sent to the gateway.
    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn context_window(&self) -> u32 {
        self.context_window
    }
}

#[async_trait]
impl AgentClient for GatewayAgent {
    async fn invoke(&self, query: &str) -> Result<AgentOutput, AgentError> {
        let estimate = estimated_tokens(query);
        if estimate > self.context_window as usize {
            warn!(
                estimated_tokens = estimate,
                context_window = self.context_window,
                "Query may not fit in the model context window"
            );
        }

        let request = CreateChatCompletionRequestArgs::default()
            .model(&self.model)
            .messages(vec![
                ChatCompletionRequestSystemMessageArgs::default()
                    .content(SYSTEM_PROMPT)
                    .build()?
                    .into(),
                ChatCompletionRequestUserMessageArgs::default()
                    .content(query)
                    .build()?
                    .into(),
            ])
            .build()?;

        let response: CreateChatCompletionResponse = self.client.chat().create(request).await?;

        // An empty answer is passed through; callers decide how to present it.
        let answer = response
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .unwrap_or_default();

        debug!(model = %self.model, answer_len = answer.len(), "Gateway returned an answer");
        Ok(AgentOutput::Text(answer))
    }
}
