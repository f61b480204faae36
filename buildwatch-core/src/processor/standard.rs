//! Standard build event interpretation
//!
//! Maps the server's build event vocabulary onto the callback set:
//! - `vertices_sorted`: execution order resolved, nodes validated, first layer starts
//! - `build_start`: a single node starts building
//! - `end_vertex`: a node finished, valid or not
//! - `error`: the flow as a whole failed
//! - `end`: the build is complete
//!
//! Everything else (`add_message`, `token`, ...) only reaches the sink.

use async_trait::async_trait;
use serde_json::Value;
use tracing::{debug, warn};

use super::{EventBatchProcessor, EventSink};
use crate::domain::callbacks::{BuildCallbacks, BuildStatus};
use crate::domain::event::{BuildEvent, END_EVENT};
use crate::domain::results::BuildResults;

const COMPONENT_ERROR_TITLE: &str = "Error Building Component";
const FLOW_ERROR_TITLE: &str = "Error Building Flow";
const UNKNOWN_ERROR: &str = "Unknown error";

/// Default [`EventBatchProcessor`] for build event streams
///
/// Stops the session on the first failed node or flow-level error.
#[derive(Debug, Clone, Copy, Default)]
pub struct StandardBatchProcessor;

impl StandardBatchProcessor {
    pub fn new() -> Self {
        Self
    }

    /// Handles one event, returning whether processing should continue
    fn handle_event(
        event: &BuildEvent,
        results: &mut BuildResults,
        callbacks: &mut BuildCallbacks,
    ) -> bool {
        let data = event.data();

        match event.kind() {
            Some("vertices_sorted") => {
                let ids = string_list(data.and_then(|d| d.get("ids")));
                let to_run = string_list(data.and_then(|d| d.get("to_run")));
                callbacks.on_order_resolved();
                callbacks.on_nodes_validated(&to_run);
                callbacks.on_build_start(&ids);
                true
            }
            Some("build_start") => {
                if let Some(id) = data.and_then(|d| d.get("id")).and_then(Value::as_str) {
                    callbacks.on_build_start(&[id.to_string()]);
                }
                true
            }
            Some("end_vertex") => {
                let Some(build_data) = data.and_then(|d| d.get("build_data")) else {
                    debug!("end_vertex event without build_data, ignoring");
                    return true;
                };
                let id = build_data
                    .get("id")
                    .and_then(Value::as_str)
                    .unwrap_or_default()
                    .to_string();
                let valid = build_data
                    .get("valid")
                    .and_then(Value::as_bool)
                    .unwrap_or(false);

                results.push(valid);

                if valid {
                    callbacks.on_build_update(build_data, BuildStatus::Built, &id);
                    true
                } else {
                    warn!("Node {} failed to build", id);
                    let messages = component_errors(build_data);
                    callbacks.on_build_error(
                        COMPONENT_ERROR_TITLE,
                        &messages,
                        Some(std::slice::from_ref(&id)),
                    );
                    callbacks.on_build_update(build_data, BuildStatus::Error, &id);
                    false
                }
            }
            Some("error") => {
                let text = data
                    .and_then(|d| d.get("text").or_else(|| d.get("error")))
                    .and_then(Value::as_str)
                    .unwrap_or(UNKNOWN_ERROR)
                    .to_string();
                warn!("Flow build failed: {}", text);
                results.push(false);
                callbacks.on_build_error(FLOW_ERROR_TITLE, &[text], None);
                false
            }
            Some(END_EVENT) => {
                callbacks.on_build_complete(results.all_valid());
                true
            }
            _ => true,
        }
    }
}

#[async_trait]
impl EventBatchProcessor for StandardBatchProcessor {
    async fn process(
        &mut self,
        events: &[BuildEvent],
        results: &mut BuildResults,
        callbacks: &mut BuildCallbacks,
        sink: &dyn EventSink,
    ) -> bool {
        for event in events {
            sink.emit(event);
            if !Self::handle_event(event, results, callbacks) {
                return false;
            }
        }
        true
    }
}

/// Collects the string entries of a JSON array
fn string_list(value: Option<&Value>) -> Vec<String> {
    value
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}

/// Extracts human-readable error messages from a failed node's build data
fn component_errors(build_data: &Value) -> Vec<String> {
    let inner = build_data.get("data");

    if let Some(message) = inner
        .and_then(|d| d.get("message"))
        .and_then(Value::as_str)
    {
        return vec![message.to_string()];
    }

    match build_data.get("params") {
        Some(Value::String(params)) => return vec![params.clone()],
        Some(Value::Array(_)) => {
            let messages = string_list(build_data.get("params"));
            if !messages.is_empty() {
                return messages;
            }
        }
        _ => {}
    }

    vec![UNKNOWN_ERROR.to_string()]
}
