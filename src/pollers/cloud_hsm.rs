use std::time::Duration;

use async_trait::async_trait;

use super::{DEFAULT_POLL_INTERVAL, PollError, PollResult, Poller, PollingStatus};
use crate::arm::CloudHsmClustersClient;
use crate::resourceids::CloudHsmClusterId;

const OPERATION: &str = "status message";

/// Turns a free-text status message into a [`PollingStatus`].
///
/// Kept behind a trait so the keyword heuristic can be replaced once the
/// API exposes a proper state enum.
pub trait StatusClassifier: Send + Sync {
    fn classify(&self, message: Option<&str>) -> PollingStatus;
}

/// What an empty or missing status message means.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EmptyStatusMessage {
    /// Keep polling until the service says something.
    #[default]
    InProgress,
    /// Treat silence as success, as some deployments of this API do.
    Succeeded,
}

/// Case-insensitive keyword matching: `failed` or `error` means failure,
/// `success` means success, anything else is still in progress. Failure
/// keywords win when both appear.
#[derive(Debug, Clone, Copy, Default)]
pub struct KeywordClassifier {
    pub empty: EmptyStatusMessage,
}

impl StatusClassifier for KeywordClassifier {
    fn classify(&self, message: Option<&str>) -> PollingStatus {
        let message = message.map(str::trim).unwrap_or_default();
        if message.is_empty() {
            return match self.empty {
                EmptyStatusMessage::InProgress => PollingStatus::InProgress,
                EmptyStatusMessage::Succeeded => PollingStatus::Succeeded,
            };
        }

        let lower = message.to_lowercase();
        if lower.contains("failed") || lower.contains("error") {
            PollingStatus::Failed
        } else if lower.contains("success") {
            PollingStatus::Succeeded
        } else {
            PollingStatus::InProgress
        }
    }
}

/// Waits for a Cloud HSM cluster, which reports progress only through a
/// free-text `statusMessage`.
#[derive(Debug, Clone)]
pub struct CloudHsmClusterStatePoller<C = KeywordClassifier> {
    client: CloudHsmClustersClient,
    id: CloudHsmClusterId,
    classifier: C,
    interval: Duration,
}

impl CloudHsmClusterStatePoller {
    pub fn new(client: CloudHsmClustersClient, id: CloudHsmClusterId) -> Self {
        Self::with_classifier(client, id, KeywordClassifier::default())
    }
}

impl<C: StatusClassifier> CloudHsmClusterStatePoller<C> {
    pub fn with_classifier(
        client: CloudHsmClustersClient,
        id: CloudHsmClusterId,
        classifier: C,
    ) -> Self {
        Self {
            client,
            id,
            classifier,
            interval: DEFAULT_POLL_INTERVAL,
        }
    }

    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }
}

#[async_trait]
impl<C: StatusClassifier> Poller for CloudHsmClusterStatePoller<C> {
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

        let message = resp.model.status_message();
        let status = self.classifier.classify(message);
        tracing::debug!(id = %self.id, ?message, %status, "polled cloud HSM cluster");

        let result = match status {
            PollingStatus::InProgress => {
                PollResult::in_progress(resp.response.retry_after().unwrap_or(self.interval))
            }
            PollingStatus::Succeeded => PollResult::succeeded(),
            PollingStatus::Failed => PollResult::failed(format!(
                "{} reported status {:?}",
                self.id,
                message.unwrap_or_default()
            )),
            PollingStatus::Canceled => PollResult::canceled(format!(
                "{} reported status {:?}",
                self.id,
                message.unwrap_or_default()
            )),
        };

        Ok(result.with_response(resp.response))
    }
}
