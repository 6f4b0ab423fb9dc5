//! azpoll - Azure Resource Manager long-running operation polling
//!
//! Typed ARM resource ids, a thin ARM HTTP client, and pollers that wait for
//! asynchronous operations to reach a terminal state.

pub mod arm;
pub mod config;
pub mod output;
pub mod pollers;
pub mod resourceids;

mod error;

pub use arm::{ArmClient, ArmError, Response};
pub use config::ClientConfig;
pub use error::AzpollError;
pub use pollers::{
    LongRunningPoller, PollError, PollOptions, PollResult, Poller, PollingFailedError,
    PollingStatus, poll_until_done,
};
pub use resourceids::{AzureResourceId, ParseError, ResourceId};
