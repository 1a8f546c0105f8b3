//! WebSocket Streaming Sessions
//!
//! - `protocol`: the JSON frames exchanged with the browser.
//! - `registry`: bookkeeping of live connections.
//! - `session`: the per-connection read loop that answers queries.

pub mod protocol;
pub mod registry;
pub mod session;

pub use session::ws_handler;
