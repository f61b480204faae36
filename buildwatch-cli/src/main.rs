//! Buildwatch CLI
//!
//! Command-line interface for starting, watching and cancelling builds on a
//! flow build service.

mod commands;
mod config;

use anyhow::Result;
use clap::Parser;
use commands::{Commands, handle_command};
use config::Config;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "buildwatch")]
#[command(about = "Watch flow builds by polling their event stream", long_about = None)]
struct Cli {
    /// Build service URL
    #[arg(
        long,
        env = "BUILDWATCH_SERVER_URL",
        default_value = "http://localhost:7860"
    )]
    server_url: String,

    /// Delay in milliseconds before retrying an empty poll
    #[arg(long)]
    idle_delay_ms: Option<u64>,

    /// Delay in milliseconds between polls once events arrived
    #[arg(long)]
    poll_interval_ms: Option<u64>,

    #[command(subcommand)]
    command: Commands,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "buildwatch=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let config = Config::new(cli.server_url, cli.idle_delay_ms, cli.poll_interval_ms);
    config.validate()?;

    handle_command(cli.command, &config).await
}
