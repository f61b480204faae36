//! Commands module
//!
//! Defines all CLI commands and their handlers.

mod build;

use anyhow::Result;
use clap::Subcommand;
use uuid::Uuid;

use crate::config::Config;

/// Top-level CLI commands
#[derive(Subcommand)]
pub enum Commands {
    /// Start building a flow and watch its progress
    Run {
        /// Flow ID
        flow_id: Uuid,

        /// Flow inputs as a JSON object
        #[arg(long)]
        inputs: Option<String>,

        /// Start the build at this component
        #[arg(long)]
        start_component: Option<String>,

        /// Stop the build after this component
        #[arg(long)]
        stop_component: Option<String>,
    },
    /// Watch the progress of a running build
    Watch {
        /// Build job ID
        job_id: Uuid,
    },
    /// Cancel a running build
    Cancel {
        /// Build job ID
        job_id: Uuid,
    },
}

/// Handle a CLI command
///
/// Routes the command to the appropriate handler.
///
/// # Arguments
/// * `command` - The command to execute
/// * `config` - The CLI configuration
pub async fn handle_command(command: Commands, config: &Config) -> Result<()> {
    match command {
        Commands::Run {
            flow_id,
            inputs,
            start_component,
            stop_component,
        } => build::run_flow(config, flow_id, inputs, start_component, stop_component).await,
        Commands::Watch { job_id } => build::watch_job(config, job_id).await,
        Commands::Cancel { job_id } => build::cancel_job(config, job_id).await,
    }
}
