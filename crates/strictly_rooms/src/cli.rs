//! Command-line interface for strictly_rooms.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Strictly Rooms - two-player tic-tac-toe rooms over WebSockets
#[derive(Parser, Debug)]
#[command(name = "strictly_rooms")]
#[command(about = "Room matching server for N×N tic-tac-toe", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Subcommand to run
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run the room server
    Serve {
        /// Path to a TOML config file
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Host to bind to (overrides config and HOST)
        #[arg(long)]
        host: Option<String>,

        /// Port to bind to (overrides config and PORT)
        #[arg(short, long)]
        port: Option<u16>,
    },
}
