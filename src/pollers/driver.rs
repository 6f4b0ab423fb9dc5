use std::time::Duration;

use tokio::sync::watch;
use tokio::time::Instant;

use super::{DEFAULT_POLL_INTERVAL, PollError, PollResult, Poller, PollingFailedError, PollingStatus};

#[derive(Debug, Clone)]
pub struct PollOptions {
    /// Wait used when neither the poll result nor `minimum_interval` sets one.
    pub default_interval: Duration,
    /// Lower bound applied to every wait, including server-supplied ones.
    pub minimum_interval: Option<Duration>,
    /// Overall deadline for the whole wait, measured from the first poll.
    pub timeout: Option<Duration>,
}

impl Default for PollOptions {
    fn default() -> Self {
        Self {
            default_interval: DEFAULT_POLL_INTERVAL,
            minimum_interval: None,
            timeout: None,
        }
    }
}

impl PollOptions {
    pub fn with_default_interval(mut self, interval: Duration) -> Self {
        self.default_interval = interval;
        self
    }

    pub fn with_minimum_interval(mut self, interval: Duration) -> Self {
        self.minimum_interval = Some(interval);
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

/// Drives a [`Poller`] until the operation reaches a terminal state.
///
/// Polls are strictly sequential. There is no attempt cap: the loop ends on a
/// terminal status, a poll error, cancellation, or the timeout.
///
/// Cancellation is signalled by sending `true` on a `watch` channel whose
/// receiver is handed to [`LongRunningPoller::poll_until_done`]. Dropping the
/// sender without sending leaves the wait uncancellable.
pub struct LongRunningPoller<P> {
    poller: P,
    options: PollOptions,
    attempts: u32,
}

impl<P: Poller> LongRunningPoller<P> {
    pub fn new(poller: P, options: PollOptions) -> Self {
        Self {
            poller,
            options,
            attempts: 0,
        }
    }

    /// Number of `poll` calls issued so far, including ones that returned an
    /// error or were abandoned on cancellation or timeout.
    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    pub fn into_inner(self) -> P {
        self.poller
    }

    /// How long to wait after an in-progress `result`.
    pub fn next_interval(&self, result: &PollResult) -> Duration {
        let reported = result.poll_interval.filter(|interval| !interval.is_zero());
        match (reported, self.options.minimum_interval) {
            (Some(reported), Some(minimum)) => reported.max(minimum),
            (Some(reported), None) => reported,
            (None, Some(minimum)) => minimum,
            (None, None) => self.options.default_interval,
        }
    }

    /// Polls until done.
    ///
    /// Returns the terminal `Succeeded` result. A `Failed` or `Canceled`
    /// status becomes [`PollError::Failed`]; any error from `poll` is
    /// returned as-is without retrying. Cancellation and the deadline are
    /// observed both while a poll is in flight and while sleeping.
    pub async fn poll_until_done(
        &mut self,
        mut cancel: watch::Receiver<bool>,
    ) -> Result<PollResult, PollError> {
        let timeout = self.options.timeout;
        // A timeout too large to represent as an instant never fires.
        let deadline = timeout.and_then(|t| Instant::now().checked_add(t));
        let timed_out = || PollError::DeadlineExceeded(timeout.unwrap_or_default());

        loop {
            if *cancel.borrow() {
                return Err(PollError::Canceled);
            }
            if deadline.is_some_and(|deadline| Instant::now() >= deadline) {
                return Err(timed_out());
            }

            self.attempts += 1;
            let poll = self.poller.poll();
            let result = tokio::select! {
                biased;
                _ = canceled(&mut cancel) => return Err(PollError::Canceled),
                _ = deadline_elapsed(deadline) => return Err(timed_out()),
                result = poll => result?,
            };

            match result.status {
                PollingStatus::Succeeded => {
                    tracing::info!(attempts = self.attempts, "long-running operation succeeded");
                    return Ok(result);
                }
                PollingStatus::Failed | PollingStatus::Canceled => {
                    let err = PollingFailedError::from_result(result);
                    tracing::warn!(
                        attempts = self.attempts,
                        status = %err.status,
                        message = %err.message,
                        "long-running operation failed"
                    );
                    return Err(err.into());
                }
                PollingStatus::InProgress => {}
            }

            let interval = self.next_interval(&result);
            tracing::debug!(
                attempt = self.attempts,
                interval_ms = interval.as_millis() as u64,
                "long-running operation in progress"
            );

            tokio::select! {
                biased;
                _ = canceled(&mut cancel) => return Err(PollError::Canceled),
                _ = deadline_elapsed(deadline) => return Err(timed_out()),
                _ = tokio::time::sleep(interval) => {}
            }
        }
    }
}

async fn canceled(cancel: &mut watch::Receiver<bool>) {
    if cancel.wait_for(|canceled| *canceled).await.is_err() {
        std::future::pending::<()>().await;
    }
}

async fn deadline_elapsed(deadline: Option<Instant>) {
    match deadline {
        Some(deadline) => tokio::time::sleep_until(deadline).await,
        None => std::future::pending::<()>().await,
    }
}

/// Convenience wrapper for one-shot waits.
pub async fn poll_until_done<P: Poller>(
    poller: P,
    options: PollOptions,
    cancel: watch::Receiver<bool>,
) -> Result<PollResult, PollError> {
    LongRunningPoller::new(poller, options)
        .poll_until_done(cancel)
        .await
}
