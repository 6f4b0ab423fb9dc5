use reqwest::Method;
use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue};
use url::Url;

use super::ArmError;
use super::types::{RequestOptions, Response};
use crate::config::ClientConfig;

/// Thin HTTP client for Azure Resource Manager.
///
/// Cheap to clone and safe to share between concurrent pollers: the
/// underlying `reqwest::Client` pools connections and holds no per-call state.
#[derive(Clone)]
pub struct ArmClient {
    client: reqwest::Client,
    base_url: String,
}

impl ArmClient {
    pub fn new(config: &ClientConfig) -> Result<Self, ArmError> {
        Self::create_client(config)
    }

    /// NOTE: Primarily used for testing with mock servers.
    pub fn with_base_url(token: String, base_url: String) -> Result<Self, ArmError> {
        Self::create_client(&ClientConfig::new(token).with_endpoint(base_url))
    }

    fn create_client(config: &ClientConfig) -> Result<Self, ArmError> {
        let mut headers = HeaderMap::new();
        let auth_value = format!("Bearer {}", config.token);
        let header_value = HeaderValue::from_str(&auth_value).map_err(|_| ArmError::Auth {
            message: "Invalid token format".to_string(),
        })?;
        headers.insert(AUTHORIZATION, header_value);

        let mut builder = reqwest::Client::builder()
            .default_headers(headers)
            .user_agent(config.user_agent.clone());
        if let Some(timeout) = config.request_timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().map_err(ArmError::Network)?;

        Ok(Self {
            client,
            base_url: config.endpoint.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn new_request(&self, options: RequestOptions) -> Result<reqwest::Request, ArmError> {
        let raw = format!("{}{}", self.base_url, options.path);
        let mut url = Url::parse(&raw).map_err(|e| ArmError::InvalidUrl {
            url: raw.clone(),
            message: e.to_string(),
        })?;
        if let Some(api_version) = &options.api_version {
            url.query_pairs_mut()
                .append_pair("api-version", api_version);
        }

        let mut request = self.client.request(options.method, url);
        if let Some(body) = &options.body {
            request = request.json(body);
        }

        Ok(request.build()?)
    }

    /// Sends `request` and buffers the body. Any HTTP status is returned as a
    /// response; deciding which codes are errors is up to the caller.
    pub async fn execute(&self, request: reqwest::Request) -> Result<Response, ArmError> {
        let method = request.method().clone();
        let path = request.url().path().to_string();

        let response = self.client.execute(request).await?;
        let status = response.status();
        let headers = response.headers().clone();
        let body = response.bytes().await?;

        tracing::debug!(%method, %path, status = status.as_u16(), "ARM request completed");

        Ok(Response {
            status,
            headers,
            body,
        })
    }

    pub async fn get(&self, path: &str, api_version: &str) -> Result<Response, ArmError> {
        let request = self.new_request(RequestOptions::get(path, api_version))?;
        self.execute(request).await
    }

    /// GETs an absolute URL handed out by the service, such as a `Location`
    /// or `Azure-AsyncOperation` header. These already carry their own
    /// `api-version`.
    pub async fn get_url(&self, url: &str) -> Result<Response, ArmError> {
        let url = Url::parse(url).map_err(|e| ArmError::InvalidUrl {
            url: url.to_string(),
            message: e.to_string(),
        })?;
        let request = self.client.request(Method::GET, url).build()?;
        self.execute(request).await
    }
}

impl std::fmt::Debug for ArmClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ArmClient")
            .field("base_url", &self.base_url)
            .field("token", &"[REDACTED]")
            .finish()
    }
}
