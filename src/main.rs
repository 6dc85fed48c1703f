//! Ludo Lobby Server
//!
//! Loads the account store, serves the lobby protocol over WebSocket, and
//! writes the store back on shutdown.

use std::sync::Arc;

use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

use ludo_lobby::{LobbyServer, ServerConfig, VERSION};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let config = ServerConfig::from_env();
    info!("Ludo Lobby Server v{}", VERSION);
    info!("users file: {}", config.users_file.display());

    // Failing to load the account store aborts startup; there is no
    // partial-start mode.
    let server = Arc::new(LobbyServer::new(config)?);

    let run = {
        let server = server.clone();
        tokio::spawn(async move { server.run().await })
    };

    tokio::signal::ctrl_c().await?;
    info!("shutting down");
    server.shutdown();
    run.await??;

    server.save_users().await?;
    Ok(())
}
