//! ChatMirror CLI — the main entry point.
//!
//! Commands:
//! - `run`    — Start the widget poll loop, rendering to the terminal
//! - `once`   — Assemble one prompt, issue one request, print the result
//! - `doctor` — Diagnose configuration and endpoint health

use std::path::PathBuf;

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(
    name = "chatmirror",
    about = "ChatMirror — a chat-completion widget for smart mirrors",
    version,
    author
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to the config file (default: ~/.chatmirror/config.toml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the widget poll loop, rendering to the terminal
    Run,

    /// Assemble one prompt, issue one request, and print the result
    Once,

    /// Diagnose configuration and endpoint health
    Doctor,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Initialize tracing
    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(filter)),
        )
        .with_target(false)
        .init();

    match cli.command {
        Commands::Run => commands::run::run(cli.config).await?,
        Commands::Once => commands::once::run(cli.config).await?,
        Commands::Doctor => commands::doctor::run(cli.config).await?,
    }

    Ok(())
}
