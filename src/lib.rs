//! # Ludo Lobby Server
//!
//! Connection-oriented lobby server for Ludo board clients: accounts,
//! sessions, and static board data over a private message protocol.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                    LUDO LOBBY SERVER                         │
//! ├─────────────────────────────────────────────────────────────┤
//! │  protocol/       - Wire vocabulary                           │
//! │  ├── action.rs   - Closed action-name/code table             │
//! │  └── package.rs  - Message shape + JSON/binary codec         │
//! │                                                              │
//! │  session/        - Authentication state machine              │
//! │  └── registry.rs - Durable store + live index, one lock      │
//! │                                                              │
//! │  network/        - Dispatch and transport                    │
//! │  ├── dispatch.rs - Route inbound packages to handlers        │
//! │  └── server.rs   - WebSocket accept loop, connection ids     │
//! │                                                              │
//! │  storage/        - I/O collaborators                         │
//! │  ├── users.rs    - username|password credential file         │
//! │  └── boards.rs   - Static board resources                    │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every inbound message resolves to exactly one reply: the transport
//! delivers `(connection, package)`, the dispatcher decodes the action code
//! and runs one handler, the handler consults the session registry or a
//! storage collaborator and builds its reply through the action table.
//! Unknown codes, malformed contents, and unknown board names all collapse
//! into the canonical "unknown request" reply.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]

pub mod network;
pub mod protocol;
pub mod session;
pub mod storage;

// Re-export commonly used types
pub use network::{LobbyServer, LobbyService, ServerConfig};
pub use protocol::{Action, Package, UNKNOWN_CODE};
pub use session::{AuthError, ConnectionId, SessionRegistry, User};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
