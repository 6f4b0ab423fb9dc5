use thiserror::Error;

/// Errors raised while talking to Azure Resource Manager.
///
/// SECURITY: Error messages must NEVER contain the bearer token.
#[derive(Debug, Error)]
pub enum ArmError {
    /// Authentication failed (invalid or expired token)
    #[error("authentication failed: {message}")]
    Auth { message: String },

    /// API returned an unexpected status code
    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    /// Network-level error (connection failed, timeout, etc.)
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("invalid request URL {url:?}: {message}")]
    InvalidUrl { url: String, message: String },

    /// Response body was not the JSON shape the operation expects
    #[error("decoding response body: {0}")]
    Decode(#[from] serde_json::Error),
}
