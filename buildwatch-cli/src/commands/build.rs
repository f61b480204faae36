//! Build command handlers
//!
//! Starts, watches and cancels builds. Watching prints node progress as the
//! build service reports it and exits non-zero when the build fails.

use anyhow::{Context, Result};
use buildwatch_client::{BuildClient, SessionOutcome};
use buildwatch_core::dto::build::StartBuildRequest;
use buildwatch_core::{
    BuildCallbacks, BuildEvent, BuildResults, BuildStatus, ChannelEventSink,
    StandardBatchProcessor,
};
use colored::*;
use serde_json::Value as JsonValue;
use tokio::sync::mpsc::UnboundedReceiver;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::config::Config;

fn client_for(config: &Config) -> BuildClient {
    BuildClient::new(&config.server_url).with_settings(config.poll_settings)
}

/// Start a flow build and watch it to the end
pub async fn run_flow(
    config: &Config,
    flow_id: Uuid,
    inputs: Option<String>,
    start_component: Option<String>,
    stop_component: Option<String>,
) -> Result<()> {
    let inputs = inputs
        .map(|raw| serde_json::from_str::<JsonValue>(&raw))
        .transpose()
        .context("Failed to parse --inputs as JSON")?;

    let request = StartBuildRequest {
        inputs,
        start_component_id: start_component,
        stop_component_id: stop_component,
    };

    let client = client_for(config);
    let job = client
        .start_build(flow_id, &request)
        .await
        .context("Failed to start build")?;

    println!(
        "{} {}",
        "Started build".bold(),
        job.job_id.to_string().cyan()
    );

    watch(&client, job.job_id).await
}

/// Watch an already running build
pub async fn watch_job(config: &Config, job_id: Uuid) -> Result<()> {
    let client = client_for(config);
    watch(&client, job_id).await
}

/// Ask the build service to cancel a build
pub async fn cancel_job(config: &Config, job_id: Uuid) -> Result<()> {
    let client = client_for(config);
    let response = client
        .cancel_build(job_id)
        .await
        .context("Failed to cancel build")?;

    if response.success {
        println!("{} {}", "✓".green(), format!("Cancelled build {}", job_id).bold());
    } else {
        println!("{} {}", "✗".red(), response.message.yellow());
    }

    Ok(())
}

async fn watch(client: &BuildClient, job_id: Uuid) -> Result<()> {
    let cancel = CancellationToken::new();
    let interrupt = spawn_interrupt_handler(cancel.clone());

    let (tx, rx) = tokio::sync::mpsc::unbounded_channel();
    let sink = ChannelEventSink::new(tx);
    let printer = tokio::spawn(print_messages(rx));

    let mut results = BuildResults::new();
    let mut callbacks = progress_callbacks();
    let mut processor = StandardBatchProcessor::new();

    let outcome = client
        .watch_build(
            job_id,
            &mut results,
            &mut callbacks,
            &cancel,
            &sink,
            &mut processor,
        )
        .await;

    interrupt.abort();
    drop(sink);
    let _ = printer.await;

    match outcome {
        Ok(SessionOutcome::Completed) if results.all_valid() => Ok(()),
        Ok(SessionOutcome::Completed) => anyhow::bail!("Build {} finished with errors", job_id),
        Ok(SessionOutcome::Stopped) => anyhow::bail!("Build {} failed", job_id),
        Err(e) if e.is_cancelled() => {
            println!("{}", "Interrupted, cancelling build...".yellow());
            if let Err(e) = client.cancel_build(job_id).await {
                warn!("Failed to cancel build {}: {}", job_id, e);
            }
            anyhow::bail!("Build {} cancelled", job_id)
        }
        Err(e) => Err(e).context(format!("Failed to watch build {}", job_id)),
    }
}

/// Cancels the session on Ctrl-C
fn spawn_interrupt_handler(cancel: CancellationToken) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            cancel.cancel();
        }
    })
}

/// Prints chat messages carried by the event stream
///
/// Streamed tokens and every other event are only logged at debug level.
async fn print_messages(mut rx: UnboundedReceiver<BuildEvent>) {
    while let Some(event) = rx.recv().await {
        match event.kind() {
            Some("add_message") => {
                if let Some((sender, text)) = chat_message(&event) {
                    println!("    {} {}", format!("{}:", sender).dimmed(), text);
                }
            }
            Some("token") => {
                let chunk = event
                    .data()
                    .and_then(|d| d.get("chunk"))
                    .and_then(JsonValue::as_str)
                    .unwrap_or_default();
                debug!("Token {:?}", chunk);
            }
            kind => debug!("Event {}", kind.unwrap_or("<untyped>")),
        }
    }
}

/// Sender and non-empty text of an `add_message` event
fn chat_message(event: &BuildEvent) -> Option<(&str, &str)> {
    let data = event.data()?;
    let sender = data
        .get("sender_name")
        .and_then(JsonValue::as_str)
        .unwrap_or("message");
    let text = data
        .get("text")
        .and_then(JsonValue::as_str)
        .filter(|text| !text.is_empty())?;
    Some((sender, text))
}

/// Callbacks that print build progress
fn progress_callbacks() -> BuildCallbacks {
    BuildCallbacks::new()
        .with_order_resolved(|| println!("{}", "Execution order resolved".dimmed()))
        .with_nodes_validated(|ids| {
            println!("{}", format!("{} node(s) to run", ids.len()).dimmed())
        })
        .with_build_start(|ids| {
            for id in ids {
                println!("  {} Building {}", "▸".cyan(), id);
            }
        })
        .with_build_update(|_, status, id| print_node_status(status, id))
        .with_build_error(|title, messages, ids| {
            println!("{}", title.red().bold());
            if let Some(ids) = ids {
                println!("  {} {}", "Nodes:".bold(), ids.join(", "));
            }
            for message in messages {
                println!("  {}", message.red());
            }
        })
        .with_build_complete(|valid| {
            if valid {
                println!("{}", "✓ Build completed successfully".green().bold());
            } else {
                println!("{}", "⚠ Build completed with errors".yellow().bold());
            }
        })
}

fn print_node_status(status: BuildStatus, id: &str) {
    match status {
        BuildStatus::Built => println!("  {} {}", "✓".green(), id),
        BuildStatus::Error => println!("  {} {}", "✗".red(), id),
        other => println!("  {} {} ({:?})", "·".dimmed(), id, other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use buildwatch_core::EventSink;
    use std::time::Duration;

    #[test]
    fn test_client_uses_configured_settings() {
        let config = Config::new("http://localhost:7860/".to_string(), Some(10), Some(20));
        let client = client_for(&config);

        assert_eq!(client.base_url(), "http://localhost:7860");
        assert_eq!(client.settings().poll_interval, Duration::from_millis(20));
    }

    #[tokio::test]
    async fn test_printer_drains_until_sink_dropped() {
        let (tx, rx) = tokio::sync::mpsc::unbounded_channel();
        let sink = ChannelEventSink::new(tx);
        let printer = tokio::spawn(print_messages(rx));

        sink.emit(&BuildEvent::new(serde_json::json!({
            "event": "add_message",
            "data": {"sender_name": "AI", "text": "hello"}
        })));
        drop(sink);

        printer.await.unwrap();
    }

    #[test]
    fn test_chat_message_extraction() {
        let event = BuildEvent::new(serde_json::json!({
            "event": "add_message",
            "data": {"sender_name": "AI", "text": "hello"}
        }));
        assert_eq!(chat_message(&event), Some(("AI", "hello")));

        let anonymous = BuildEvent::new(serde_json::json!({
            "event": "add_message",
            "data": {"text": "hi"}
        }));
        assert_eq!(chat_message(&anonymous), Some(("message", "hi")));

        let empty = BuildEvent::new(serde_json::json!({
            "event": "add_message",
            "data": {"sender_name": "AI", "text": ""}
        }));
        assert_eq!(chat_message(&empty), None);

        let no_data = BuildEvent::new(serde_json::json!({"event": "add_message"}));
        assert_eq!(chat_message(&no_data), None);
    }
}
