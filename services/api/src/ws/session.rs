//! Manages the WebSocket connection lifecycle for a streaming chat session.

use super::{
    protocol::{ClientMessage, StreamFrame},
    registry::SessionHandle,
};
use crate::{prompt::compose_query, state::AppState};
use anyhow::Result;
use axum::{
    extract::{
        State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    response::Response,
};
use futures_util::{Sink, SinkExt, Stream, StreamExt};
use mind_search_core::AgentClient;
use std::{fmt::Display, sync::Arc};
use tokio::sync::Mutex;
use tracing::{debug, error, info, instrument, warn};
use uuid::Uuid;

/// Placeholder sent as soon as a query is accepted.
pub const THINKING_PLACEHOLDER: &str = "Thinking...";

/// Sent instead of an empty answer.
pub const EMPTY_ANSWER_FALLBACK: &str =
    "I'm sorry, I couldn't generate a response. Please try again.";

/// Failures that can occur while serving a streaming session.
///
/// `is_fatal` decides whether the session is torn down or the failure is
/// reported in-band as an `error` frame.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// The client sent text that is not a valid query.
    #[error("Invalid message: {0}")]
    Validation(String),
    /// The agent failed to answer.
    #[error("Error processing request: {0}")]
    AgentInvocation(String),
    /// The answer frames for the current query could not be sent.
    #[error("Error sending response: {0}")]
    Transport(String),
    /// The client sent a frame type this protocol does not use.
    #[error("Unsupported WebSocket frame: {0}")]
    Protocol(String),
    /// Reading from the socket failed.
    #[error("WebSocket receive failed: {0}")]
    Receive(String),
    /// An `error` frame could not be delivered.
    #[error("Connection is no longer writable: {0}")]
    Undeliverable(String),
}

impl SessionError {
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            SessionError::Protocol(_) | SessionError::Receive(_) | SessionError::Undeliverable(_)
        )
    }
}

/// Axum handler to upgrade an HTTP connection to a WebSocket.
pub async fn ws_handler(ws: WebSocketUpgrade, State(state): State<Arc<AppState>>) -> Response {
    ws.on_upgrade(|socket| handle_socket(socket, state))
}

/// Main handler for an individual WebSocket connection.
///
/// Registers the connection, serves queries until the client leaves or a
/// fatal error occurs, then removes the registry entry.
#[instrument(name = "ws_session", skip_all, fields(session_id))]
async fn handle_socket(socket: WebSocket, state: Arc<AppState>) {
    let session_id = Uuid::new_v4();
    tracing::Span::current().record("session_id", tracing::field::display(session_id));

    let (socket_tx, socket_rx) = socket.split();
    let handle: SessionHandle = Arc::new(Mutex::new(socket_tx));
    if state.sessions.register(session_id, handle.clone()).await.is_some() {
        warn!("Replaced an existing registry entry for this session id");
    }
    let active_sessions = state.sessions.len().await;
    info!(active_sessions, "WebSocket connected");

    match run_session(state.agent.as_ref(), &*handle, socket_rx).await {
        Ok(()) => info!("WebSocket disconnected"),
        Err(e) => {
            error!(error = %e, "WebSocket session terminated");
            // Best effort: the socket may already be gone.
            let _ = send_frame(&*handle, &StreamFrame::error(e.to_string())).await;
        }
    }

    state.sessions.unregister(session_id).await;
    let _ = handle.lock().await.close().await;
    let active_sessions = state.sessions.len().await;
    debug!(active_sessions, "Session removed from registry");
}

/// The read loop of a session.
///
/// Returns `Ok(())` when the client disconnects and `Err` on a fatal error.
/// Non-fatal errors are reported to the client and the loop continues.
pub(crate) async fn run_session<S, R, E>(
    agent: &dyn AgentClient,
    socket_tx: &Mutex<S>,
    mut socket_rx: R,
) -> Result<(), SessionError>
where
    S: Sink<Message> + Unpin,
    S::Error: std::error::Error + Send + Sync + 'static,
    R: Stream<Item = Result<Message, E>> + Unpin,
    E: Display,
{
    while let Some(msg_result) = socket_rx.next().await {
        let ws_msg = msg_result.map_err(|e| SessionError::Receive(e.to_string()))?;
        match ws_msg {
            Message::Text(text) => {
                if let Err(e) = handle_query(agent, socket_tx, text.as_str()).await {
                    if e.is_fatal() {
                        return Err(e);
                    }
                    warn!(error = %e, "Query failed; reporting to client");
                    send_frame(socket_tx, &StreamFrame::error(e.to_string()))
                        .await
                        .map_err(|send_err| SessionError::Undeliverable(send_err.to_string()))?;
                }
            }
            Message::Binary(data) => {
                return Err(SessionError::Protocol(format!(
                    "binary frame of {} bytes",
                    data.len()
                )));
            }
            Message::Close(_) => {
                info!("Client sent close frame.");
                break;
            }
            Message::Ping(_) | Message::Pong(_) => {}
        }
    }
    Ok(())
}

/// Serves one query: placeholder, agent run, answer, completion.
async fn handle_query<S>(
    agent: &dyn AgentClient,
    socket_tx: &Mutex<S>,
    text: &str,
) -> Result<(), SessionError>
where
    S: Sink<Message> + Unpin,
    S::Error: std::error::Error + Send + Sync + 'static,
{
    let request =
        ClientMessage::parse(text).map_err(|e| SessionError::Validation(e.to_string()))?;
    let preview: String = request.message.chars().take(50).collect();
    info!(%preview, history_len = request.history().len(), "Received request");

    let query = compose_query(&request.message, request.history());

    // A failed placeholder counts against the agent run, not the answer delivery.
    send_frame(socket_tx, &StreamFrame::chunk(THINKING_PLACEHOLDER))
        .await
        .map_err(|e| SessionError::AgentInvocation(e.to_string()))?;

    let output = agent
        .invoke(&query)
        .await
        .map_err(|e| SessionError::AgentInvocation(e.to_string()))?;

    let mut answer = output.into_text();
    if answer.trim().is_empty() {
        warn!("Empty response from agent");
        answer = EMPTY_ANSWER_FALLBACK.to_string();
    }
    debug!(answer_len = answer.len(), "Agent answered");

    send_frame(socket_tx, &StreamFrame::chunk(answer.clone()))
        .await
        .map_err(|e| SessionError::Transport(e.to_string()))?;
    send_frame(socket_tx, &StreamFrame::complete(answer))
        .await
        .map_err(|e| SessionError::Transport(e.to_string()))?;
    Ok(())
}

/// A helper function to serialize and send a `StreamFrame` to the client.
pub(crate) async fn send_frame<S>(socket_tx: &Mutex<S>, frame: &StreamFrame) -> Result<()>
where
    S: Sink<Message> + Unpin,
    S::Error: std::error::Error + Send + Sync + 'static,
{
    let serialized = serde_json::to_string(frame)?;
    socket_tx
        .lock()
        .await
        .send(Message::Text(serialized.into()))
        .await?;
    Ok(())
}
