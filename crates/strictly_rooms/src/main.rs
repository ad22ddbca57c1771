//! Strictly Rooms - server entry point.

#![warn(missing_docs)]

mod cli;

use anyhow::{Context, Result};
use clap::Parser;
use cli::{Cli, Command};
use std::path::PathBuf;
use std::time::Duration;
use strictly_rooms::{ChannelTransport, RoomHandlers, ServerConfig, router, spawn_hub};
use tracing::{info, instrument};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,strictly_rooms=debug")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Serve { config, host, port } => serve(config, host, port).await,
    }
}

/// Layers the configuration: defaults, file, environment, flags.
fn load_config(
    path: Option<PathBuf>,
    host: Option<String>,
    port: Option<u16>,
) -> Result<ServerConfig> {
    let config = match path {
        Some(path) => ServerConfig::from_file(&path)?,
        None => ServerConfig::default(),
    };
    Ok(config
        .with_env(|key| std::env::var(key))?
        .with_overrides(host, port))
}

/// Runs the room server until Ctrl-C.
#[instrument(skip_all)]
async fn serve(path: Option<PathBuf>, host: Option<String>, port: Option<u16>) -> Result<()> {
    let config = load_config(path, host, port)?;
    info!(
        board_side = config.board_side(),
        leave_on_disconnect = config.leave_on_disconnect(),
        "Starting Strictly Rooms"
    );

    let handlers = RoomHandlers::from_config(&config, ChannelTransport::new());
    let (hub, hub_task) = spawn_hub(handlers);
    let app = router(hub);

    let address = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&address)
        .await
        .with_context(|| format!("Failed to bind {}", address))?;
    info!(%address, "Listening on ws://{}/ws", address);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    // Upgraded sockets may still hold hub handles after shutdown.
    match tokio::time::timeout(Duration::from_secs(2), hub_task).await {
        Ok(handlers) => {
            let handlers = handlers.context("Hub task failed")?;
            info!(rooms = handlers.registry().len(), "Server stopped");
        }
        Err(_) => info!("Server stopped with sockets still open"),
    }
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for Ctrl-C");
        std::future::pending::<()>().await;
    }
    info!("Shutdown requested");
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_load_config_flags_win() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "port = 4000\nboard_side = 4").unwrap();

        let config = load_config(
            Some(file.path().to_path_buf()),
            Some("127.0.0.1".to_string()),
            Some(4100),
        )
        .unwrap();
        assert_eq!(config.bind_address(), "127.0.0.1:4100");
        assert_eq!(*config.board_side(), 4);
    }

    #[test]
    fn test_load_config_missing_file() {
        let err = load_config(Some(PathBuf::from("/no/such/rooms.toml")), None, None).unwrap_err();
        assert!(err.to_string().contains("Failed to read"));
    }
}
