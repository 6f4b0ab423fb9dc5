use std::time::Duration;

use async_trait::async_trait;

use super::{DEFAULT_POLL_INTERVAL, PollError, PollResult, Poller};
use crate::arm::DeletedConfigurationStoresClient;
use crate::resourceids::DeletedConfigurationStoreId;

const OPERATION: &str = "deleted configuration store";

/// Waits for a purged App Configuration store to disappear.
///
/// The purge call returns 200 with nothing to poll on, so progress is read
/// from the status code of the deleted store alone: 200 while it still
/// exists, 404 once it is gone.
#[derive(Debug, Clone)]
pub struct PurgeDeletedPoller {
    client: DeletedConfigurationStoresClient,
    id: DeletedConfigurationStoreId,
    interval: Duration,
}

impl PurgeDeletedPoller {
    pub fn new(client: DeletedConfigurationStoresClient, id: DeletedConfigurationStoreId) -> Self {
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
impl Poller for PurgeDeletedPoller {
    async fn poll(&self) -> Result<PollResult, PollError> {
        let resp = self
            .client
            .get_deleted(&self.id)
            .await
            .map_err(|source| PollError::Retrieval {
                operation: OPERATION,
                id: self.id.to_string(),
                source,
            })?;

        tracing::debug!(id = %self.id, status = resp.status.as_u16(), "polled purge");

        if resp.was_not_found() {
            return Ok(PollResult::succeeded().with_response(resp));
        }

        if resp.is_status(200) {
            let interval = resp.retry_after().unwrap_or(self.interval);
            return Ok(PollResult::in_progress(interval).with_response(resp));
        }

        Err(PollError::UnexpectedStatus {
            operation: OPERATION,
            id: self.id.to_string(),
            status: resp.status.as_u16(),
            message: resp.error_message(),
        })
    }
}
