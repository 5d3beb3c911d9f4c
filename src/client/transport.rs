//! HTTP transport used by the coordinator
//!
//! The [`Transport`] trait sends exactly one request and reports either the
//! response (any status) or a network-level failure. Session recovery is
//! layered on top by the coordinator, so transports stay unaware of it.

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, CONTENT_TYPE};
use reqwest::Client;
use std::time::Duration;
use thiserror::Error;

use super::error::ClientError;
use super::request::{ApiRequest, ApiResponse};
use crate::config::ApiConfig;

/// Header carrying a per-dispatch correlation id
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Failure where no HTTP response was received
#[derive(Error, Debug, Clone)]
#[error("{message}")]
pub struct TransportError {
    pub message: String,
    pub timeout: bool,
}

impl TransportError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            timeout: false,
        }
    }

    /// The request was sent but no response arrived in time
    pub fn timed_out(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            timeout: true,
        }
    }
}

impl From<reqwest::Error> for TransportError {
    fn from(err: reqwest::Error) -> Self {
        Self {
            timeout: err.is_timeout(),
            message: err.to_string(),
        }
    }
}

/// Sends one request to the API
#[async_trait]
pub trait Transport: Send + Sync {
    /// Execute `request` once; non-success statuses are returned as `Ok`
    async fn execute(&self, request: &ApiRequest) -> Result<ApiResponse, TransportError>;
}

/// Production transport on top of `reqwest`
///
/// The client keeps a cookie store, so the session cookie set by login and
/// refresh is sent automatically on later calls.
pub struct ReqwestTransport {
    client: Client,
    base_url: String,
}

impl ReqwestTransport {
    /// Create a transport from API configuration
    ///
    /// # Errors
    ///
    /// Returns `ClientError::Init` if the HTTP client cannot be created
    pub fn new(config: &ApiConfig) -> Result<Self, ClientError> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .user_agent(config.user_agent.as_str())
            .default_headers(headers)
            .gzip(true)
            .cookie_store(config.enable_cookies)
            .build()
            .map_err(|e| ClientError::Init(e.to_string()))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url_for(&self, path: &str) -> String {
        if path.starts_with('/') {
            format!("{}{}", self.base_url, path)
        } else {
            format!("{}/{}", self.base_url, path)
        }
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn execute(&self, request: &ApiRequest) -> Result<ApiResponse, TransportError> {
        let request_id = uuid::Uuid::new_v4().to_string();

        let mut builder = self
            .client
            .request(request.method.clone(), self.url_for(&request.path))
            .headers(request.headers.clone())
            .header(REQUEST_ID_HEADER, request_id.as_str());

        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }

        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        tracing::trace!(
            request_id = %request_id,
            method = %request.method,
            path = %request.path,
            "Dispatching request"
        );

        let response = builder.send().await?;
        let status = response.status();
        let headers = response.headers().clone();
        let body = response.bytes().await?;

        Ok(ApiResponse::new(status, headers, body))
    }
}
