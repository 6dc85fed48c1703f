//! Protocol Layer
//!
//! The wire vocabulary: the closed action table and the message shape
//! shared by client and server.

pub mod action;
pub mod package;

pub use action::{Action, UNKNOWN_CODE};
pub use package::Package;
