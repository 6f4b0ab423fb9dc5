use std::time::Duration;

use bytes::Bytes;
use reqwest::header::{HeaderMap, RETRY_AFTER};
use reqwest::{Method, StatusCode};
use serde::Deserialize;
use serde::de::DeserializeOwned;

use super::ArmError;

/// Header ARM sets on accepted long-running operations pointing at an
/// operation-status resource.
pub const AZURE_ASYNC_OPERATION: &str = "azure-asyncoperation";

/// Maximum length of a response body echoed into an error message.
const MAX_ERROR_BODY_LENGTH: usize = 200;

#[derive(Debug, Clone)]
pub struct RequestOptions {
    pub method: Method,
    /// Path relative to the endpoint, typically a resource id.
    pub path: String,
    pub api_version: Option<String>,
    pub body: Option<serde_json::Value>,
}

impl RequestOptions {
    pub fn get(path: impl Into<String>, api_version: impl Into<String>) -> Self {
        Self {
            method: Method::GET,
            path: path.into(),
            api_version: Some(api_version.into()),
            body: None,
        }
    }
}

/// A fully buffered HTTP response.
///
/// The body is read once in `ArmClient::execute` so it can be decoded and
/// still be attached to a poll result or failure for diagnostics.
#[derive(Debug, Clone)]
pub struct Response {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Bytes,
}

impl Response {
    pub fn unmarshal<T: DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        serde_json::from_slice(&self.body)
    }

    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(str::trim)
            .filter(|v| !v.is_empty())
    }

    /// `Retry-After` in its delta-seconds form. ARM does not send HTTP dates.
    pub fn retry_after(&self) -> Option<Duration> {
        self.header(RETRY_AFTER.as_str())
            .and_then(|v| v.parse::<u64>().ok())
            .filter(|secs| *secs > 0)
            .map(Duration::from_secs)
    }

    pub fn was_not_found(&self) -> bool {
        self.status == StatusCode::NOT_FOUND
    }

    pub fn is_status(&self, code: u16) -> bool {
        self.status.as_u16() == code
    }

    /// Best-effort human-readable error message from an ARM error body.
    pub fn error_message(&self) -> String {
        if let Ok(body) = self.unmarshal::<ArmErrorResponse>() {
            if let Some(message) = body.error.describe() {
                return message;
            }
        }

        let text = self.text();
        if text.trim().is_empty() {
            return self
                .status
                .canonical_reason()
                .unwrap_or("Unknown error")
                .to_string();
        }

        if text.len() > MAX_ERROR_BODY_LENGTH {
            let cut = (0..=MAX_ERROR_BODY_LENGTH)
                .rev()
                .find(|i| text.is_char_boundary(*i))
                .unwrap_or(0);
            format!("{}... [truncated, {} bytes total]", &text[..cut], text.len())
        } else {
            text
        }
    }

    pub fn ensure_status(&self, expected: &[u16]) -> Result<(), ArmError> {
        if expected.contains(&self.status.as_u16()) {
            return Ok(());
        }

        let message = self.error_message();
        match self.status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Err(ArmError::Auth { message }),
            status => Err(ArmError::Api {
                status: status.as_u16(),
                message,
            }),
        }
    }
}

/// A response together with the model decoded from its body.
#[derive(Debug, Clone)]
pub struct ModelResponse<T> {
    pub response: Response,
    pub model: T,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ArmErrorResponse {
    pub error: ArmErrorDetail,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ArmErrorDetail {
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

impl ArmErrorDetail {
    pub fn describe(&self) -> Option<String> {
        match (self.code.as_deref(), self.message.as_deref()) {
            (Some(code), Some(message)) => Some(format!("{}: {}", code, message)),
            (None, Some(message)) => Some(message.to_string()),
            (Some(code), None) => Some(code.to_string()),
            (None, None) => None,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Experiment {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub provisioning_state: Option<String>,
    #[serde(default)]
    pub properties: Option<ExperimentProperties>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExperimentProperties {
    #[serde(default)]
    pub provisioning_state: Option<String>,
}

impl Experiment {
    /// `properties.provisioningState`, or the top-level field some API
    /// versions return instead.
    pub fn provisioning_state(&self) -> Option<&str> {
        self.properties
            .as_ref()
            .and_then(|p| p.provisioning_state.as_deref())
            .or(self.provisioning_state.as_deref())
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CloudHsmCluster {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub status_message: Option<String>,
    #[serde(default)]
    pub properties: Option<CloudHsmClusterProperties>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CloudHsmClusterProperties {
    #[serde(default)]
    pub provisioning_state: Option<String>,
    #[serde(default)]
    pub status_message: Option<String>,
}

impl CloudHsmCluster {
    pub fn status_message(&self) -> Option<&str> {
        self.properties
            .as_ref()
            .and_then(|p| p.status_message.as_deref())
            .or(self.status_message.as_deref())
    }
}

/// Body of an `Azure-AsyncOperation` status resource.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OperationStatus {
    pub status: String,
    #[serde(default)]
    pub error: Option<ArmErrorDetail>,
    #[serde(default)]
    pub percent_complete: Option<f64>,
}
