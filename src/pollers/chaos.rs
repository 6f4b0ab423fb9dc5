use std::time::Duration;

use async_trait::async_trait;

use super::{DEFAULT_POLL_INTERVAL, PollError, PollResult, Poller, PollingStatus, ProvisioningState};
use crate::arm::ExperimentsClient;
use crate::resourceids::ExperimentId;

const OPERATION: &str = "provisioning state";

/// Waits for a Chaos Studio experiment's `provisioningState` to settle.
#[derive(Debug, Clone)]
pub struct ChaosExperimentPoller {
    client: ExperimentsClient,
    id: ExperimentId,
    interval: Duration,
}

impl ChaosExperimentPoller {
    pub fn new(client: ExperimentsClient, id: ExperimentId) -> Self {
        Self {
            client,
            id,
            interval: DEFAULT_POLL_INTERVAL,
        }
    }

    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }
}

#[async_trait]
impl Poller for ChaosExperimentPoller {
    async fn poll(&self) -> Result<PollResult, PollError> {
        let resp = self
            .client
            .get(&self.id)
            .await
            .map_err(|source| PollError::Retrieval {
                operation: OPERATION,
                id: self.id.to_string(),
                source,
            })?;

        let state = resp
            .model
            .provisioning_state()
            .map(ProvisioningState::parse)
            .ok_or_else(|| PollError::Decode {
                operation: OPERATION,
                id: self.id.to_string(),
                message: "response did not contain a provisioningState".to_string(),
            })?;

        tracing::debug!(id = %self.id, %state, "polled experiment");

        let result = match state.polling_status() {
            PollingStatus::InProgress => {
                PollResult::in_progress(resp.response.retry_after().unwrap_or(self.interval))
            }
            PollingStatus::Succeeded => PollResult::succeeded(),
            PollingStatus::Failed => {
                PollResult::failed(format!("{} has provisioning state {}", self.id, state))
            }
            PollingStatus::Canceled => {
                PollResult::canceled(format!("{} has provisioning state {}", self.id, state))
            }
        };

        Ok(result.with_response(resp.response))
    }
}
