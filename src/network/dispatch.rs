//! Request Dispatch
//!
//! Routes one inbound package to its handler and produces exactly one
//! reply package. The dispatcher itself performs no authentication; each
//! handler decides whether the caller must already hold a session (only
//! logout does). Undecodable codes, actions with no handler, and handlers
//! given too few content fields all get the canonical "unknown request"
//! reply with no state mutation.

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::protocol::{Action, Package};
use crate::session::{AuthError, ConnectionId, SessionRegistry};
use crate::storage::{BoardKind, BoardLibrary};

/// The protocol core: dispatcher, handlers, and the state they share.
#[derive(Debug)]
pub struct LobbyService {
    registry: Arc<SessionRegistry>,
    boards: BoardLibrary,
}

impl LobbyService {
    /// Assemble the service around its collaborators.
    pub fn new(registry: Arc<SessionRegistry>, boards: BoardLibrary) -> Self {
        Self { registry, boards }
    }

    /// The shared session registry.
    pub fn registry(&self) -> &Arc<SessionRegistry> {
        &self.registry
    }

    /// Route `package` from `connection` to its handler and return the reply
    /// the transport must send back on the same connection.
    pub async fn dispatch(&self, connection: ConnectionId, package: Package) -> Package {
        debug!(connection, request = %package, "dispatching");
        match package.kind() {
            Some(Action::Login) => self.login(connection, &package.contents).await,
            Some(Action::Logout) => self.logout(connection).await,
            Some(Action::Register) => self.register(connection, &package.contents).await,
            Some(Action::GetBoard) => self.get_board(&package.contents),
            _ => Self::invalid_request(connection),
        }
    }

    /// Canonical reply for anything the server does not understand.
    fn invalid_request(connection: ConnectionId) -> Package {
        debug!(connection, "invalid request");
        Package::notify(Action::UnknownRequest)
    }

    async fn login(&self, connection: ConnectionId, contents: &[String]) -> Package {
        let (Some(username), Some(password)) = (contents.first(), contents.get(1)) else {
            return Self::invalid_request(connection);
        };
        match self.registry.login(connection, username, password).await {
            Ok(token) => {
                info!(connection, username, "login successful");
                Package::build(Action::LoginSuccessful, vec![token])
            }
            Err(AuthError::DuplicateLogin) => {
                warn!(connection, username, "duplicate login");
                Package::notify(Action::DuplicateLogin)
            }
            // NoSuchUser and BadPassword are deliberately indistinguishable
            // on the wire; distinct replies would allow username probing.
            Err(err) => {
                debug!(connection, username, %err, "login rejected");
                Package::notify(Action::LoginFailure)
            }
        }
    }

    async fn logout(&self, connection: ConnectionId) -> Package {
        match self.registry.logout(connection).await {
            Ok(()) => {
                info!(connection, "logout successful");
                Package::notify(Action::LogoutSuccessful)
            }
            Err(_) => {
                debug!(connection, "logout without session");
                Package::notify(Action::LogoutFailure)
            }
        }
    }

    async fn register(&self, connection: ConnectionId, contents: &[String]) -> Package {
        let (Some(username), Some(password)) = (contents.first(), contents.get(1)) else {
            return Self::invalid_request(connection);
        };
        match self.registry.register(connection, username, password).await {
            Ok(token) => {
                info!(connection, username, "account registered");
                Package::build(Action::RegisterSuccessful, vec![token])
            }
            Err(AuthError::DuplicateLogin) => {
                warn!(connection, username, "register while logged in");
                Package::build(
                    Action::RegisterFailure,
                    vec!["Already logged in.".to_string()],
                )
            }
            Err(err) => {
                debug!(connection, username, %err, "register rejected");
                Package::build(Action::RegisterFailure, vec!["Username taken.".to_string()])
            }
        }
    }

    /// Any connected client may fetch a board, authenticated or not.
    fn get_board(&self, contents: &[String]) -> Package {
        let Some(kind) = contents.first().and_then(|s| BoardKind::parse(s)) else {
            return Package::notify(Action::UnknownRequest);
        };
        match self.boards.load(kind) {
            Ok(tokens) => Package::build(Action::Board, tokens),
            Err(err) => {
                warn!(?kind, %err, "board load failed");
                Package::notify(Action::UnknownRequest)
            }
        }
    }
}
