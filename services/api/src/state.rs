//! Shared Application State
//!
//! This module defines the `AppState` struct, which holds the resources shared
//! by every handler: the agent client and the registry of live sessions.

use crate::ws::registry::SessionRegistry;
use mind_search_core::AgentClient;
use std::sync::Arc;

/// The shared application state, created once at startup and passed to all handlers.
#[derive(Clone)]
pub struct AppState {
    pub agent: Arc<dyn AgentClient>,
    pub sessions: Arc<SessionRegistry>,
}

impl AppState {
    pub fn new(agent: Arc<dyn AgentClient>) -> Self {
        Self {
            agent,
            sessions: Arc::new(SessionRegistry::new()),
        }
    }
}
