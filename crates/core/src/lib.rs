//! Mind Search Core
//!
//! The agent-facing half of the service: the `AgentClient` capability that the
//! HTTP and WebSocket handlers call into, and a gateway-backed implementation
//! of it.

pub mod agent;
pub mod gateway;

pub use agent::{AgentClient, AgentError, AgentOutput};
pub use gateway::{GatewayAgent, GatewaySettings};
