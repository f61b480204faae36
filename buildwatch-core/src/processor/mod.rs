//! Event batch processing
//!
//! The poller hands every decoded batch to an [`EventBatchProcessor`], which
//! owns all interpretation of event contents and decides whether polling
//! should continue. Raw events are also offered to an [`EventSink`].

mod standard;

pub use standard::StandardBatchProcessor;

use async_trait::async_trait;
use tokio::sync::mpsc::UnboundedSender;

use crate::domain::callbacks::BuildCallbacks;
use crate::domain::event::BuildEvent;
use crate::domain::results::BuildResults;

/// Receives raw events as they are processed
pub trait EventSink: Send + Sync {
    /// Offers one event to the sink
    fn emit(&self, event: &BuildEvent);
}

/// Sink that discards every event
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopEventSink;

impl EventSink for NoopEventSink {
    fn emit(&self, _event: &BuildEvent) {}
}

/// Sink that forwards a copy of every event over a channel
///
/// A dropped receiver is ignored.
#[derive(Debug, Clone)]
pub struct ChannelEventSink {
    tx: UnboundedSender<BuildEvent>,
}

impl ChannelEventSink {
    pub fn new(tx: UnboundedSender<BuildEvent>) -> Self {
        Self { tx }
    }
}

impl EventSink for ChannelEventSink {
    fn emit(&self, event: &BuildEvent) {
        let _ = self.tx.send(event.clone());
    }
}

/// Interprets one polling cycle's worth of events
///
/// Implementations mutate `results` and drive `callbacks` as they see fit.
#[async_trait]
pub trait EventBatchProcessor: Send {
    /// Processes a batch in order
    ///
    /// # Returns
    /// `true` to keep polling, `false` to stop the session
    async fn process(
        &mut self,
        events: &[BuildEvent],
        results: &mut BuildResults,
        callbacks: &mut BuildCallbacks,
        sink: &dyn EventSink,
    ) -> bool;
}
