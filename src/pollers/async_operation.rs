use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::LOCATION;

use super::{DEFAULT_POLL_INTERVAL, PollError, PollResult, Poller, PollingStatus, ProvisioningState};
use crate::arm::{AZURE_ASYNC_OPERATION, ArmClient, OperationStatus, Response};

/// Where an accepted operation asked to be polled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PollingUrl {
    /// `Azure-AsyncOperation`: a status resource with a `status` field.
    AsyncOperation(String),
    /// `Location`: 202 until done, then the final result.
    Location(String),
}

impl PollingUrl {
    pub fn as_str(&self) -> &str {
        match self {
            PollingUrl::AsyncOperation(url) | PollingUrl::Location(url) => url,
        }
    }

    fn operation(&self) -> &'static str {
        match self {
            PollingUrl::AsyncOperation(_) => "async operation status",
            PollingUrl::Location(_) => "location status",
        }
    }
}

/// Builds a poller for the operation a mutating request started.
///
/// Returns `None` when the response carries neither polling header, meaning
/// the operation completed synchronously. `Azure-AsyncOperation` is
/// preferred over `Location` when both are present.
pub fn poller_from_response(client: &ArmClient, response: &Response) -> Option<AsyncOperationPoller> {
    let url = response
        .header(AZURE_ASYNC_OPERATION)
        .map(|url| PollingUrl::AsyncOperation(url.to_string()))
        .or_else(|| {
            response
                .header(LOCATION.as_str())
                .map(|url| PollingUrl::Location(url.to_string()))
        })?;

    let interval = response.retry_after().unwrap_or(DEFAULT_POLL_INTERVAL);
    Some(AsyncOperationPoller::new(client.clone(), url).with_interval(interval))
}

#[derive(Debug, Clone)]
pub struct AsyncOperationPoller {
    client: ArmClient,
    url: PollingUrl,
    interval: Duration,
}

impl AsyncOperationPoller {
    pub fn new(client: ArmClient, url: PollingUrl) -> Self {
        Self {
            client,
            url,
            interval: DEFAULT_POLL_INTERVAL,
        }
    }

    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    pub fn url(&self) -> &PollingUrl {
        &self.url
    }

    fn poll_async_operation(&self, resp: Response) -> Result<PollResult, PollError> {
        if !resp.status.is_success() {
            return Err(self.unexpected_status(&resp));
        }

        let body: OperationStatus = resp.unmarshal().map_err(|e| PollError::Decode {
            operation: self.url.operation(),
            id: self.url.as_str().to_string(),
            message: e.to_string(),
        })?;

        let state = ProvisioningState::parse(&body.status);
        let detail = || {
            body.error
                .as_ref()
                .and_then(|e| e.describe())
                .unwrap_or_else(|| format!("operation status was {}", state))
        };

        let result = match state.polling_status() {
            PollingStatus::InProgress => {
                PollResult::in_progress(resp.retry_after().unwrap_or(self.interval))
            }
            PollingStatus::Succeeded => PollResult::succeeded(),
            PollingStatus::Failed => PollResult::failed(detail()),
            PollingStatus::Canceled => PollResult::canceled(detail()),
        };

        Ok(result.with_response(resp))
    }

    fn poll_location(&self, resp: Response) -> Result<PollResult, PollError> {
        let result = match resp.status.as_u16() {
            202 => PollResult::in_progress(resp.retry_after().unwrap_or(self.interval)),
            200 | 201 | 204 => PollResult::succeeded(),
            _ if resp.status.is_client_error() || resp.status.is_server_error() => {
                PollResult::failed(resp.error_message())
            }
            _ => return Err(self.unexpected_status(&resp)),
        };

        Ok(result.with_response(resp))
    }

    fn unexpected_status(&self, resp: &Response) -> PollError {
        PollError::UnexpectedStatus {
            operation: self.url.operation(),
            id: self.url.as_str().to_string(),
            status: resp.status.as_u16(),
            message: resp.error_message(),
        }
    }
}

#[async_trait]
impl Poller for AsyncOperationPoller {
    async fn poll(&self) -> Result<PollResult, PollError> {
        let resp = self
            .client
            .get_url(self.url.as_str())
            .await
            .map_err(|source| PollError::Retrieval {
                operation: self.url.operation(),
                id: self.url.as_str().to_string(),
                source,
            })?;

        tracing::debug!(
            url = self.url.as_str(),
            status = resp.status.as_u16(),
            "polled long-running operation"
        );

        match self.url {
            PollingUrl::AsyncOperation(_) => self.poll_async_operation(resp),
            PollingUrl::Location(_) => self.poll_location(resp),
        }
    }
}
