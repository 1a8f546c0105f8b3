//! Mind Search API Library Crate
//!
//! This library contains the web-facing half of the service: configuration,
//! request models, prompt composition, the HTTP handlers, the WebSocket
//! streaming sessions, and routing. The binaries are thin wrappers around it.

pub mod config;
pub mod handlers;
pub mod models;
pub mod prompt;
pub mod router;
pub mod state;
pub mod ws;

#[cfg(test)]
pub(crate) mod test_support;
