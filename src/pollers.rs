//! Long-running operation polling.
//!
//! A [`Poller`] knows how to ask one kind of operation "are you done yet?"
//! and how to translate whatever the API answers into a [`PollResult`].
//! [`LongRunningPoller`] drives any poller to a terminal state, so the wait
//! loop is written once and reused for every operation family.

mod async_operation;
mod chaos;
mod cloud_hsm;
mod driver;
mod error;
mod purge;

pub use async_operation::{AsyncOperationPoller, PollingUrl, poller_from_response};
pub use chaos::ChaosExperimentPoller;
pub use cloud_hsm::{
    CloudHsmClusterStatePoller, EmptyStatusMessage, KeywordClassifier, StatusClassifier,
};
pub use driver::{LongRunningPoller, PollOptions, poll_until_done};
pub use error::{PollError, PollingFailedError};
pub use purge::PurgeDeletedPoller;

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;

use crate::arm::Response;

/// Interval used when neither the service nor the caller says how long to wait.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(10);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PollingStatus {
    Succeeded,
    InProgress,
    Failed,
    Canceled,
}

impl PollingStatus {
    pub fn is_terminal(self) -> bool {
        !matches!(self, PollingStatus::InProgress)
    }
}

impl fmt::Display for PollingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            PollingStatus::Succeeded => "Succeeded",
            PollingStatus::InProgress => "InProgress",
            PollingStatus::Failed => "Failed",
            PollingStatus::Canceled => "Canceled",
        };
        f.write_str(s)
    }
}

/// Outcome of a single status check.
#[derive(Debug, Clone)]
pub struct PollResult {
    pub status: PollingStatus,
    /// How long to wait before polling again. Only meaningful while
    /// `InProgress`; `None` lets the driver pick.
    pub poll_interval: Option<Duration>,
    /// The response the status was read from, kept for diagnostics.
    pub response: Option<Response>,
    /// Human-readable detail, typically the reason for a failure.
    pub message: Option<String>,
}

impl PollResult {
    pub fn succeeded() -> Self {
        Self::new(PollingStatus::Succeeded)
    }

    pub fn in_progress(poll_interval: Duration) -> Self {
        Self {
            poll_interval: Some(poll_interval),
            ..Self::new(PollingStatus::InProgress)
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            message: Some(message.into()),
            ..Self::new(PollingStatus::Failed)
        }
    }

    pub fn canceled(message: impl Into<String>) -> Self {
        Self {
            message: Some(message.into()),
            ..Self::new(PollingStatus::Canceled)
        }
    }

    fn new(status: PollingStatus) -> Self {
        Self {
            status,
            poll_interval: None,
            response: None,
            message: None,
        }
    }

    pub fn with_response(mut self, response: Response) -> Self {
        self.response = Some(response);
        self
    }
}

/// One long-running operation that can report its own progress.
///
/// `poll` issues exactly one status read. It must not loop or sleep; that is
/// the driver's job. Dropping the returned future abandons the read.
#[async_trait]
pub trait Poller: Send + Sync {
    async fn poll(&self) -> Result<PollResult, PollError>;
}

#[async_trait]
impl<P: Poller + ?Sized> Poller for Box<P> {
    async fn poll(&self) -> Result<PollResult, PollError> {
        (**self).poll().await
    }
}

/// ARM `provisioningState`, compared case-insensitively.
///
/// Anything other than the three terminal values is a provider-specific
/// in-progress state such as `Creating`, `Updating` or `Running`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProvisioningState {
    Succeeded,
    Failed,
    Canceled,
    Other(String),
}

impl ProvisioningState {
    pub fn parse(input: &str) -> Self {
        let trimmed = input.trim();
        if trimmed.eq_ignore_ascii_case("succeeded") {
            ProvisioningState::Succeeded
        } else if trimmed.eq_ignore_ascii_case("failed") {
            ProvisioningState::Failed
        } else if trimmed.eq_ignore_ascii_case("canceled") || trimmed.eq_ignore_ascii_case("cancelled")
        {
            ProvisioningState::Canceled
        } else {
            ProvisioningState::Other(trimmed.to_string())
        }
    }

    pub fn polling_status(&self) -> PollingStatus {
        match self {
            ProvisioningState::Succeeded => PollingStatus::Succeeded,
            ProvisioningState::Failed => PollingStatus::Failed,
            ProvisioningState::Canceled => PollingStatus::Canceled,
            ProvisioningState::Other(_) => PollingStatus::InProgress,
        }
    }
}

impl fmt::Display for ProvisioningState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProvisioningState::Succeeded => f.write_str("Succeeded"),
            ProvisioningState::Failed => f.write_str("Failed"),
            ProvisioningState::Canceled => f.write_str("Canceled"),
            ProvisioningState::Other(state) => f.write_str(state),
        }
    }
}
