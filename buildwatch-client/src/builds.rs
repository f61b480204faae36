//! Build lifecycle endpoints

use buildwatch_core::dto::build::{BuildJob, CancelBuildResponse, StartBuildRequest};
use buildwatch_core::{BuildCallbacks, BuildResults, EventBatchProcessor, EventSink};
use tokio_util::sync::CancellationToken;
use tracing::info;
use uuid::Uuid;

use crate::BuildClient;
use crate::error::Result;
use crate::poller::SessionOutcome;

impl BuildClient {
    // =============================================================================
    // Build Lifecycle
    // =============================================================================

    /// Start building a flow with polling event delivery
    ///
    /// # Arguments
    /// * `flow_id` - The flow to build
    /// * `req` - Optional inputs and start/stop components
    ///
    /// # Returns
    /// The job handle whose events can be polled
    pub async fn start_build(&self, flow_id: Uuid, req: &StartBuildRequest) -> Result<BuildJob> {
        let url = format!("{}/api/v1/build/{}/flow", self.base_url, flow_id);
        let response = self
            .client
            .post(&url)
            .query(&[("event_delivery", "polling")])
            .json(req)
            .send()
            .await?;

        let job: BuildJob = self.handle_response(response).await?;
        info!("Started build {} for flow {}", job.job_id, flow_id);
        Ok(job)
    }

    /// Ask the build service to cancel a running build
    ///
    /// # Arguments
    /// * `job_id` - The build job to cancel
    pub async fn cancel_build(&self, job_id: Uuid) -> Result<CancelBuildResponse> {
        let url = format!("{}/api/v1/build/{}/cancel", self.base_url, job_id);
        let response = self.client.post(&url).send().await?;

        self.handle_response(response).await
    }

    // =============================================================================
    // Build Events
    // =============================================================================

    /// URL of the events endpoint for a build job
    pub fn build_events_url(&self, job_id: Uuid) -> String {
        format!("{}/api/v1/build/{}/events", self.base_url, job_id)
    }

    /// Poll a build job's events until the session terminates
    ///
    /// Shorthand for [`BuildClient::poll_build_events`] on
    /// [`BuildClient::build_events_url`].
    pub async fn watch_build(
        &self,
        job_id: Uuid,
        results: &mut BuildResults,
        callbacks: &mut BuildCallbacks,
        cancel: &CancellationToken,
        sink: &dyn EventSink,
        processor: &mut dyn EventBatchProcessor,
    ) -> Result<SessionOutcome> {
        let url = self.build_events_url(job_id);
        self.poll_build_events(&url, results, callbacks, cancel, sink, processor)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_events_url() {
        let client = BuildClient::new("http://localhost:7860/");
        let job_id = Uuid::nil();
        assert_eq!(
            client.build_events_url(job_id),
            "http://localhost:7860/api/v1/build/00000000-0000-0000-0000-000000000000/events"
        );
    }
}
