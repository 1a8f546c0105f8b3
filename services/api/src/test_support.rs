//! Shared fakes for unit tests.

use crate::ws::protocol::StreamFrame;
use async_trait::async_trait;
use axum::extract::ws::Message;
use futures_util::Sink;
use mind_search_core::{AgentClient, AgentError, AgentOutput};
use mockall::mock;
use std::{
    io,
    pin::Pin,
    task::{Context, Poll},
};

mock! {
    pub Agent {}

    #[async_trait]
    impl AgentClient for Agent {
        async fn invoke(&self, query: &str) -> Result<AgentOutput, AgentError>;
    }
}

/// A socket write half that records text frames and fails chosen sends.
///
/// Send attempts are numbered from 1; attempts listed in `failing` return a
/// broken-pipe error and are not recorded.
#[derive(Default)]
pub struct RecordingSink {
    sent: Vec<Message>,
    attempts: usize,
    failing: Vec<usize>,
}

impl RecordingSink {
    pub fn failing_on(attempts: &[usize]) -> Self {
        Self {
            failing: attempts.to_vec(),
            ..Self::default()
        }
    }

    /// Decodes every recorded text frame.
    pub fn frames(&self) -> Vec<StreamFrame> {
        self.sent
            .iter()
            .filter_map(|msg| match msg {
                Message::Text(text) => Some(
                    serde_json::from_str(text.as_str()).expect("server sent an invalid frame"),
                ),
                _ => None,
            })
            .collect()
    }
}

impl Sink<Message> for RecordingSink {
    type Error = io::Error;

    fn poll_ready(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }

    fn start_send(mut self: Pin<&mut Self>, item: Message) -> Result<(), Self::Error> {
        self.attempts += 1;
        if self.failing.contains(&self.attempts) {
            return Err(io::Error::new(io::ErrorKind::BrokenPipe, "broken pipe"));
        }
        self.sent.push(item);
        Ok(())
    }

    fn poll_flush(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }

    fn poll_close(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }
}
