//! Network Layer
//!
//! The message dispatcher and the WebSocket transport that feeds it.

pub mod dispatch;
pub mod server;

pub use dispatch::LobbyService;
pub use server::{LobbyServer, LobbyServerError, ServerConfig};
