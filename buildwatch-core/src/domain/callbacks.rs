//! Build callback set
//!
//! The named callbacks a caller hands to the poller. The poller forwards them
//! untouched; only the event batch processor invokes them.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Build status of a single node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BuildStatus {
    ToBuild,
    Building,
    Built,
    Inactive,
    Error,
}

type StartFn = Box<dyn FnMut(&[String]) + Send>;
type UpdateFn = Box<dyn FnMut(&Value, BuildStatus, &str) + Send>;
type CompleteFn = Box<dyn FnMut(bool) + Send>;
type ErrorFn = Box<dyn FnMut(&str, &[String], Option<&[String]>) + Send>;
type OrderFn = Box<dyn FnMut() + Send>;
type ValidatedFn = Box<dyn FnMut(&[String]) + Send>;

/// Caller-supplied lifecycle callbacks
///
/// Every callback is optional; invoking an unset one is a no-op.
///
/// # Example
/// ```
/// use buildwatch_core::BuildCallbacks;
///
/// let mut callbacks = BuildCallbacks::new()
///     .with_build_complete(|valid| println!("done, valid = {valid}"));
/// callbacks.on_build_complete(true);
/// ```
#[derive(Default)]
pub struct BuildCallbacks {
    build_start: Option<StartFn>,
    build_update: Option<UpdateFn>,
    build_complete: Option<CompleteFn>,
    build_error: Option<ErrorFn>,
    order_resolved: Option<OrderFn>,
    nodes_validated: Option<ValidatedFn>,
}

impl BuildCallbacks {
    pub fn new() -> Self {
        Self::default()
    }

    // =============================================================================
    // Builders
    // =============================================================================

    /// Called with the ids of nodes that start building
    pub fn with_build_start(mut self, f: impl FnMut(&[String]) + Send + 'static) -> Self {
        self.build_start = Some(Box::new(f));
        self
    }

    /// Called with a node's build payload, its new status and its id
    pub fn with_build_update(
        mut self,
        f: impl FnMut(&Value, BuildStatus, &str) + Send + 'static,
    ) -> Self {
        self.build_update = Some(Box::new(f));
        self
    }

    /// Called once the whole build finished, with the overall validity flag
    pub fn with_build_complete(mut self, f: impl FnMut(bool) + Send + 'static) -> Self {
        self.build_complete = Some(Box::new(f));
        self
    }

    /// Called with an error title, the error messages and optionally the failing node ids
    pub fn with_build_error(
        mut self,
        f: impl FnMut(&str, &[String], Option<&[String]>) + Send + 'static,
    ) -> Self {
        self.build_error = Some(Box::new(f));
        self
    }

    /// Called once the server resolved the execution order
    pub fn with_order_resolved(mut self, f: impl FnMut() + Send + 'static) -> Self {
        self.order_resolved = Some(Box::new(f));
        self
    }

    /// Called with the ids of the nodes that passed validation and will run
    pub fn with_nodes_validated(mut self, f: impl FnMut(&[String]) + Send + 'static) -> Self {
        self.nodes_validated = Some(Box::new(f));
        self
    }

    // =============================================================================
    // Invocation
    // =============================================================================

    pub fn on_build_start(&mut self, ids: &[String]) {
        if let Some(f) = self.build_start.as_mut() {
            f(ids);
        }
    }

    pub fn on_build_update(&mut self, payload: &Value, status: BuildStatus, id: &str) {
        if let Some(f) = self.build_update.as_mut() {
            f(payload, status, id);
        }
    }

    pub fn on_build_complete(&mut self, all_nodes_valid: bool) {
        if let Some(f) = self.build_complete.as_mut() {
            f(all_nodes_valid);
        }
    }

    pub fn on_build_error(&mut self, title: &str, messages: &[String], ids: Option<&[String]>) {
        if let Some(f) = self.build_error.as_mut() {
            f(title, messages, ids);
        }
    }

    pub fn on_order_resolved(&mut self) {
        if let Some(f) = self.order_resolved.as_mut() {
            f();
        }
    }

    pub fn on_nodes_validated(&mut self, ids: &[String]) {
        if let Some(f) = self.nodes_validated.as_mut() {
            f(ids);
        }
    }
}

impl std::fmt::Debug for BuildCallbacks {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BuildCallbacks")
            .field("build_start", &self.build_start.is_some())
            .field("build_update", &self.build_update.is_some())
            .field("build_complete", &self.build_complete.is_some())
            .field("build_error", &self.build_error.is_some())
            .field("order_resolved", &self.order_resolved.is_some())
            .field("nodes_validated", &self.nodes_validated.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    #[test]
    fn test_unset_callbacks_are_noops() {
        let mut callbacks = BuildCallbacks::new();
        callbacks.on_build_start(&["a".to_string()]);
        callbacks.on_build_complete(true);
        callbacks.on_order_resolved();
    }

    #[test]
    fn test_set_callbacks_are_invoked() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let start_seen = Arc::clone(&seen);
        let error_seen = Arc::clone(&seen);

        let mut callbacks = BuildCallbacks::new()
            .with_build_start(move |ids| start_seen.lock().unwrap().push(ids.join(",")))
            .with_build_error(move |title, messages, ids| {
                error_seen.lock().unwrap().push(format!(
                    "{}:{}:{}",
                    title,
                    messages.join("|"),
                    ids.map(|ids| ids.join(",")).unwrap_or_default()
                ))
            });

        callbacks.on_build_start(&["a".to_string(), "b".to_string()]);
        callbacks.on_build_error("Oops", &["bad".to_string()], None);

        assert_eq!(*seen.lock().unwrap(), vec!["a,b", "Oops:bad:"]);
    }

    #[test]
    fn test_build_status_wire_names() {
        assert_eq!(
            serde_json::to_string(&BuildStatus::ToBuild).unwrap(),
            "\"TO_BUILD\""
        );
        assert_eq!(
            serde_json::from_str::<BuildStatus>("\"BUILT\"").unwrap(),
            BuildStatus::Built
        );
    }
}
