//! WebSocket Lobby Server
//!
//! The transport the protocol core consumes: accepts connections, assigns
//! each a numeric connection id, decodes inbound frames into [`Package`]s,
//! hands them to the dispatcher, and sends the reply back on the same
//! connection. Delivery is in-order per connection; nothing is guaranteed
//! across connections.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::atomic::{AtomicU32, AtomicUsize, Ordering};
use std::sync::Arc;

use futures_util::{SinkExt, StreamExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::broadcast;
use tokio_tungstenite::{accept_async, tungstenite::Message};
use tracing::{debug, error, info, warn};

use crate::network::dispatch::LobbyService;
use crate::protocol::{Action, Package};
use crate::session::{ConnectionId, SessionRegistry};
use crate::storage::{BoardLibrary, StoreError, UserFile};

/// Server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address.
    pub bind_addr: SocketAddr,
    /// Maximum concurrent connections.
    pub max_connections: usize,
    /// Path of the credential file.
    pub users_file: PathBuf,
    /// Directory with board resources; `None` serves the embedded boards.
    pub boards_dir: Option<PathBuf>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([0, 0, 0, 0], 7878)),
            max_connections: 1000,
            users_file: PathBuf::from("./users.txt"),
            boards_dir: None,
        }
    }
}

impl ServerConfig {
    /// Build a config from environment variables, falling back to defaults:
    /// `LOBBY_BIND_ADDR`, `LOBBY_MAX_CONNECTIONS`, `LOBBY_USERS_FILE`,
    /// `LOBBY_BOARDS_DIR`.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            bind_addr: std::env::var("LOBBY_BIND_ADDR")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.bind_addr),
            max_connections: std::env::var("LOBBY_MAX_CONNECTIONS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.max_connections),
            users_file: std::env::var("LOBBY_USERS_FILE")
                .map(PathBuf::from)
                .unwrap_or(defaults.users_file),
            boards_dir: std::env::var("LOBBY_BOARDS_DIR").ok().map(PathBuf::from),
        }
    }
}

/// Lobby server errors.
#[derive(Debug, thiserror::Error)]
pub enum LobbyServerError {
    /// Failed to bind or accept.
    #[error("transport I/O: {0}")]
    Io(#[from] std::io::Error),

    /// Credential store failure. Fatal at startup only.
    #[error("credential store: {0}")]
    Store(#[from] StoreError),
}

/// The lobby server: transport plus the protocol core it drives.
pub struct LobbyServer {
    config: ServerConfig,
    service: Arc<LobbyService>,
    user_file: UserFile,
    next_connection: AtomicU32,
    active: Arc<AtomicUsize>,
    shutdown_tx: broadcast::Sender<()>,
}

impl LobbyServer {
    /// Create the server: seed/load the credential file (fatal on failure)
    /// and assemble the protocol core. No connection is accepted before the
    /// load completes.
    pub fn new(config: ServerConfig) -> Result<Self, LobbyServerError> {
        let user_file = UserFile::new(&config.users_file);
        user_file.ensure_exists()?;
        let users = user_file.load_all()?;

        let registry = Arc::new(SessionRegistry::with_users(users));
        let boards = match &config.boards_dir {
            Some(dir) => BoardLibrary::from_dir(dir),
            None => BoardLibrary::builtin(),
        };
        let service = Arc::new(LobbyService::new(registry, boards));
        let (shutdown_tx, _) = broadcast::channel(1);

        Ok(Self {
            config,
            service,
            user_file,
            next_connection: AtomicU32::new(1),
            active: Arc::new(AtomicUsize::new(0)),
            shutdown_tx,
        })
    }

    /// The protocol core, exposed for in-process clients and tests.
    pub fn service(&self) -> &Arc<LobbyService> {
        &self.service
    }

    /// Accept connections until shutdown is signalled.
    pub async fn run(&self) -> Result<(), LobbyServerError> {
        let listener = TcpListener::bind(&self.config.bind_addr).await?;
        info!("lobby server listening on {}", self.config.bind_addr);

        let mut shutdown_rx = self.shutdown_tx.subscribe();
        loop {
            tokio::select! {
                result = listener.accept() => {
                    match result {
                        Ok((stream, addr)) => {
                            if self.active.load(Ordering::SeqCst) >= self.config.max_connections {
                                warn!(%addr, "connection limit reached, rejecting");
                                continue;
                            }
                            let connection = self.next_connection.fetch_add(1, Ordering::SeqCst);
                            info!(connection, %addr, "new connection");
                            self.handle_connection(stream, connection);
                        }
                        Err(err) => error!(%err, "accept error"),
                    }
                }
                _ = shutdown_rx.recv() => {
                    info!("shutdown signal received");
                    break;
                }
            }
        }
        Ok(())
    }

    /// Drive one connection: read frames, dispatch, send replies.
    fn handle_connection(&self, stream: TcpStream, connection: ConnectionId) {
        let service = self.service.clone();
        let active = self.active.clone();
        let mut shutdown_rx = self.shutdown_tx.subscribe();

        active.fetch_add(1, Ordering::SeqCst);
        tokio::spawn(async move {
            let ws_stream = match accept_async(stream).await {
                Ok(ws) => ws,
                Err(err) => {
                    error!(connection, %err, "websocket handshake failed");
                    active.fetch_sub(1, Ordering::SeqCst);
                    return;
                }
            };
            let (mut ws_sender, mut ws_receiver) = ws_stream.split();

            loop {
                tokio::select! {
                    msg = ws_receiver.next() => {
                        let package = match msg {
                            Some(Ok(Message::Text(text))) => match Package::from_json(&text) {
                                Ok(pkg) => pkg,
                                Err(err) => {
                                    debug!(connection, %err, "unparseable text frame");
                                    Package::notify(Action::UnknownRequest)
                                }
                            },
                            Some(Ok(Message::Binary(data))) => match Package::from_bytes(&data) {
                                Ok(pkg) => pkg,
                                Err(err) => {
                                    debug!(connection, %err, "unparseable binary frame");
                                    Package::notify(Action::UnknownRequest)
                                }
                            },
                            Some(Ok(Message::Close(_))) | None => {
                                debug!(connection, "client disconnected");
                                break;
                            }
                            Some(Ok(_)) => continue,
                            Some(Err(err)) => {
                                error!(connection, %err, "websocket error");
                                break;
                            }
                        };

                        let reply = service.dispatch(connection, package).await;
                        let text = match reply.to_json() {
                            Ok(t) => t,
                            Err(err) => {
                                error!(connection, %err, "failed to serialize reply");
                                continue;
                            }
                        };
                        if ws_sender.send(Message::Text(text)).await.is_err() {
                            break;
                        }
                    }
                    _ = shutdown_rx.recv() => {
                        let _ = ws_sender.send(Message::Close(None)).await;
                        break;
                    }
                }
            }

            // A dropped connection does not log the account out; the
            // session stays live until an explicit logout.
            if service.registry().is_connected(connection).await {
                warn!(connection, "connection closed with a live session");
            }
            active.fetch_sub(1, Ordering::SeqCst);
            info!(connection, "connection cleaned up");
        });
    }

    /// Signal shutdown to the accept loop and all connection tasks.
    pub fn shutdown(&self) {
        let _ = self.shutdown_tx.send(());
    }

    /// Persist the durable account store. Called once at shutdown, after
    /// the listener has stopped.
    pub async fn save_users(&self) -> Result<(), StoreError> {
        let users = self.service.registry().users().await;
        self.user_file.save_all(&users)
    }

    /// Number of currently open connections.
    pub fn connection_count(&self) -> usize {
        self.active.load(Ordering::SeqCst)
    }
}
