//! Build event domain types

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Discriminator value the server uses to mark the end of a build's event stream
pub const END_EVENT: &str = "end";

/// A single lifecycle event decoded from one line of a polled response
///
/// The shape is opaque apart from the optional `event` discriminator.
/// Interpretation belongs to the event batch processor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BuildEvent(Value);

impl BuildEvent {
    pub fn new(value: Value) -> Self {
        Self(value)
    }

    /// The `event` discriminator, if the record is an object carrying a string one
    pub fn kind(&self) -> Option<&str> {
        self.0.get("event").and_then(Value::as_str)
    }

    /// The `data` payload, if present
    pub fn data(&self) -> Option<&Value> {
        self.0.get("data")
    }

    /// Whether this is the terminal marker
    pub fn is_end(&self) -> bool {
        self.kind() == Some(END_EVENT)
    }
}
