//! Storage Layer
//!
//! Simple I/O collaborators the protocol core consumes: the on-disk
//! credential file and the static board resources.

pub mod boards;
pub mod users;

pub use boards::{BoardError, BoardKind, BoardLibrary};
pub use users::{StoreError, UserFile};
