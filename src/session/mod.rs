//! Session Layer
//!
//! Account records and the registry that maps live connections to them.

pub mod registry;

pub use registry::{AuthError, ConnectionId, SessionRegistry, User};
