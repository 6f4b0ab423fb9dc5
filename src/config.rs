//! Client configuration.
//!
//! Everything a client needs is passed in explicitly. Nothing here reads the
//! environment; the CLI fills these in from flags and env-backed args.

use std::time::Duration;

pub const DEFAULT_ENDPOINT: &str = "https://management.azure.com";

#[derive(Clone)]
pub struct ClientConfig {
    pub endpoint: String,
    pub token: String,
    pub user_agent: String,
    /// Per-request timeout applied by the HTTP client. Distinct from the
    /// overall wait deadline, which belongs to the poll driver.
    pub request_timeout: Option<Duration>,
}

impl ClientConfig {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            token: token.into(),
            user_agent: default_user_agent(),
            request_timeout: Some(Duration::from_secs(60)),
        }
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    pub fn with_request_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.request_timeout = timeout;
        self
    }
}

pub fn default_user_agent() -> String {
    format!("azpoll/{}", env!("CARGO_PKG_VERSION"))
}

impl std::fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientConfig")
            .field("endpoint", &self.endpoint)
            .field("token", &"[REDACTED]")
            .field("user_agent", &self.user_agent)
            .field("request_timeout", &self.request_timeout)
            .finish()
    }
}
