//! Build event poller
//!
//! Observes a build by repeatedly polling its events endpoint. Each response
//! is a newline-delimited JSON batch handed to an event batch processor.
//!
//! A session ends in one of three ways:
//! - the processor asks to stop: the cancellation token is triggered and
//!   [`SessionOutcome::Stopped`] is returned
//! - a batch carries the terminal marker and the processor continued:
//!   [`SessionOutcome::Completed`]
//! - the endpoint answers with an error status, the request fails or the
//!   token is cancelled by the caller: an error is returned
//!
//! Empty responses and responses with no decodable line are not errors; the
//! poller waits the idle delay and asks again.

use buildwatch_core::ndjson::decode_batch;
use buildwatch_core::{BuildCallbacks, BuildEvent, BuildResults, EventBatchProcessor, EventSink};
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use serde_json::Value;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::BuildClient;
use crate::error::{ClientError, FALLBACK_POLL_ERROR, Result};

const NDJSON_CONTENT_TYPE: &str = "application/x-ndjson";

/// How a polling session ended without error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionOutcome {
    /// The terminal marker was observed
    Completed,
    /// The processor requested a stop; the cancellation token was triggered
    Stopped,
}

impl BuildClient {
    /// Poll a build events endpoint until the session terminates
    ///
    /// # Arguments
    /// * `url` - The events endpoint of the build to observe
    /// * `results` - Caller-owned accumulator, mutated only by the processor
    /// * `callbacks` - Forwarded to the processor untouched
    /// * `cancel` - Abort handle shared with the caller
    /// * `sink` - Raw event sink forwarded to the processor
    /// * `processor` - Interprets each batch and decides whether to continue
    ///
    /// # Errors
    /// [`ClientError::PollFailed`] on an error status, carrying the body's
    /// `detail` or a generic message; [`ClientError::RequestFailed`] when the
    /// request itself fails; [`ClientError::Cancelled`] when `cancel` fires.
    pub async fn poll_build_events(
        &self,
        url: &str,
        results: &mut BuildResults,
        callbacks: &mut BuildCallbacks,
        cancel: &CancellationToken,
        sink: &dyn EventSink,
        processor: &mut dyn EventBatchProcessor,
    ) -> Result<SessionOutcome> {
        debug!("Polling build events at {}", url);
        let mut cycle: u64 = 0;

        loop {
            let body = self.fetch_events(url, cancel).await?;
            let events = decode_batch(&body);

            if events.is_empty() {
                if body.trim().is_empty() {
                    debug!("Empty poll response, retrying");
                } else {
                    debug!("No decodable events in poll response, retrying");
                }
                pause(self.settings.idle_delay, cancel).await?;
                continue;
            }

            cycle += 1;
            let saw_end = events.iter().any(BuildEvent::is_end);
            debug!(
                "Poll cycle {}: {} event(s){}",
                cycle,
                events.len(),
                if saw_end { ", end marker present" } else { "" }
            );

            if !processor.process(&events, results, callbacks, sink).await {
                info!("Event processor stopped polling after {} cycle(s)", cycle);
                cancel.cancel();
                return Ok(SessionOutcome::Stopped);
            }

            if saw_end {
                info!("Build event stream completed after {} cycle(s)", cycle);
                return Ok(SessionOutcome::Completed);
            }

            pause(self.settings.poll_interval, cancel).await?;
        }
    }

    /// Issue one poll and return the raw body of a successful response
    async fn fetch_events(&self, url: &str, cancel: &CancellationToken) -> Result<String> {
        let request = self
            .client
            .get(url)
            .query(&[("event_delivery", "polling")])
            .header(CONTENT_TYPE, "application/json")
            .header(ACCEPT, NDJSON_CONTENT_TYPE);

        let response = tokio::select! {
            biased;
            _ = cancel.cancelled() => return Err(ClientError::Cancelled),
            response = request.send() => response?,
        };

        let status = response.status();

        if !status.is_success() {
            let body = tokio::select! {
                biased;
                _ = cancel.cancelled() => return Err(ClientError::Cancelled),
                body = response.text() => body.unwrap_or_default(),
            };
            let message = error_detail(&body);
            warn!("Polling {} failed with status {}: {}", url, status, message);
            return Err(ClientError::poll_failed(status.as_u16(), message));
        }

        tokio::select! {
            biased;
            _ = cancel.cancelled() => Err(ClientError::Cancelled),
            body = response.text() => Ok(body?),
        }
    }
}

/// Sleep for `delay` unless the session is cancelled first
async fn pause(delay: Duration, cancel: &CancellationToken) -> Result<()> {
    tokio::select! {
        biased;
        _ = cancel.cancelled() => Err(ClientError::Cancelled),
        _ = tokio::time::sleep(delay) => Ok(()),
    }
}

/// Extracts the `detail` message of an error body, or the generic fallback
fn error_detail(body: &str) -> String {
    serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|value| value.get("detail").and_then(Value::as_str).map(str::to_string))
        .unwrap_or_else(|| FALLBACK_POLL_ERROR.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_detail_uses_detail_field() {
        assert_eq!(error_detail(r#"{"detail":"boom"}"#), "boom");
    }

    #[test]
    fn test_error_detail_fallbacks() {
        assert_eq!(error_detail(""), FALLBACK_POLL_ERROR);
        assert_eq!(error_detail("<html>bad gateway</html>"), FALLBACK_POLL_ERROR);
        assert_eq!(error_detail(r#"{"message":"nope"}"#), FALLBACK_POLL_ERROR);
        assert_eq!(
            error_detail(r#"{"detail":[{"loc":["query"],"msg":"bad"}]}"#),
            FALLBACK_POLL_ERROR
        );
    }

    #[tokio::test]
    async fn test_pause_is_cut_short_by_cancellation() {
        let cancel = CancellationToken::new();
        cancel.cancel();

        let result = pause(Duration::from_secs(60), &cancel).await;
        assert!(matches!(result, Err(ClientError::Cancelled)));
    }
}
