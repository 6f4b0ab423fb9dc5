use std::time::Duration;

use thiserror::Error;

use super::{PollResult, PollingStatus};
use crate::arm::{ArmError, Response};

/// A long-running operation reached a terminal failure state.
///
/// Never retried: the remote side has already given up.
#[derive(Debug, Error)]
#[error("long-running operation {status}: {message}")]
pub struct PollingFailedError {
    pub status: PollingStatus,
    pub message: String,
    pub response: Option<Response>,
}

impl PollingFailedError {
    pub(crate) fn from_result(result: PollResult) -> Self {
        let message = result
            .message
            .unwrap_or_else(|| format!("the operation finished with status {}", result.status));
        Self {
            status: result.status,
            message,
            response: result.response,
        }
    }
}

#[derive(Debug, Error)]
pub enum PollError {
    /// The status read itself failed (network, auth, unexpected API error).
    #[error("retrieving {operation} for {id}: {source}")]
    Retrieval {
        operation: &'static str,
        id: String,
        source: ArmError,
    },

    #[error("decoding {operation} for {id}: {message}")]
    Decode {
        operation: &'static str,
        id: String,
        message: String,
    },

    #[error("unexpected status {status} polling {operation} for {id}: {message}")]
    UnexpectedStatus {
        operation: &'static str,
        id: String,
        status: u16,
        message: String,
    },

    #[error(transparent)]
    Failed(#[from] PollingFailedError),

    #[error("polling was canceled")]
    Canceled,

    #[error("polling did not finish within {0:?}")]
    DeadlineExceeded(Duration),
}

impl PollError {
    /// True when the wait was cut short by the caller rather than by the
    /// operation or the transport.
    pub fn is_cancellation(&self) -> bool {
        matches!(self, PollError::Canceled | PollError::DeadlineExceeded(_))
    }
}
