//! Request and response descriptors passed through the coordinator
//!
//! An [`ApiRequest`] is a plain value: method, path relative to the API base
//! URL, query pairs, optional JSON body and extra headers. It can be replayed
//! any number of times, which is what the refresh protocol relies on.

use bytes::Bytes;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::{Method, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;

use super::error::ClientError;

/// Login endpoint, exempt from the refresh protocol
pub const LOGIN_PATH: &str = "/auth/login";

/// Registration endpoint, exempt from the refresh protocol
pub const REGISTER_PATH: &str = "/auth/register";

/// Session refresh endpoint
pub const REFRESH_PATH: &str = "/auth/refresh";

const EXEMPT_PATHS: &[&str] = &[LOGIN_PATH, REGISTER_PATH, REFRESH_PATH];

/// Descriptor of a single REST call
#[derive(Debug, Clone)]
pub struct ApiRequest {
    /// HTTP method
    pub method: Method,

    /// Path relative to the API base URL, e.g. `/analysis/text`
    pub path: String,

    /// Query string pairs
    pub query: Vec<(String, String)>,

    /// JSON body, if any
    pub body: Option<serde_json::Value>,

    /// Extra headers sent with the request
    pub headers: HeaderMap,

    retried: bool,
    auto_refresh: bool,
}

impl ApiRequest {
    /// Create a request for an arbitrary method
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
            body: None,
            headers: HeaderMap::new(),
            retried: false,
            auto_refresh: true,
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::POST, path)
    }

    pub fn put(path: impl Into<String>) -> Self {
        Self::new(Method::PUT, path)
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::DELETE, path)
    }

    /// Add a query parameter
    pub fn with_query(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.query.push((key.into(), value.to_string()));
        self
    }

    /// Attach a JSON body serialized from `body`
    ///
    /// # Errors
    ///
    /// Returns `ClientError::InvalidRequest` if `body` cannot be serialized
    pub fn with_json<T: Serialize + ?Sized>(mut self, body: &T) -> Result<Self, ClientError> {
        let value = serde_json::to_value(body)
            .map_err(|e| ClientError::InvalidRequest(format!("unserializable body: {e}")))?;
        self.body = Some(value);
        Ok(self)
    }

    /// Attach an already-built JSON body
    pub fn with_body(mut self, body: serde_json::Value) -> Self {
        self.body = Some(body);
        self
    }

    /// Add a header; invalid names or values are ignored with a warning
    pub fn with_header(mut self, name: &str, value: &str) -> Self {
        match (
            HeaderName::from_bytes(name.as_bytes()),
            HeaderValue::from_str(value),
        ) {
            (Ok(name), Ok(value)) => {
                self.headers.insert(name, value);
            }
            _ => tracing::warn!(header = %name, "Ignoring invalid request header"),
        }
        self
    }

    /// Opt this request out of automatic session refresh.
    ///
    /// A 401 on such a request is returned to the caller as
    /// [`ClientError::UnauthenticatedContext`].
    pub fn without_auto_refresh(mut self) -> Self {
        self.auto_refresh = false;
        self
    }

    /// Whether a 401 on this request may start the refresh protocol
    pub fn auto_refresh(&self) -> bool {
        self.auto_refresh
    }

    /// Whether this request is already a replay after a refresh
    pub fn is_retried(&self) -> bool {
        self.retried
    }

    /// Consume the request and return its single allowed replay
    pub(crate) fn into_retry(mut self) -> Self {
        self.retried = true;
        self
    }

    /// Whether this request targets login, registration or refresh
    pub fn is_auth_endpoint(&self) -> bool {
        is_exempt_path(&self.path)
    }
}

/// Auth endpoints never trigger the refresh protocol.
///
/// Matching is by substring so that query strings and prefixed paths
/// (`/api/v1/auth/login`) are covered as well.
pub fn is_exempt_path(path: &str) -> bool {
    EXEMPT_PATHS.iter().any(|exempt| path.contains(exempt))
}

/// Raw response returned by a [`Transport`](super::transport::Transport)
#[derive(Debug, Clone)]
pub struct ApiResponse {
    status: StatusCode,
    headers: HeaderMap,
    body: Bytes,
}

impl ApiResponse {
    pub fn new(status: StatusCode, headers: HeaderMap, body: impl Into<Bytes>) -> Self {
        Self {
            status,
            headers,
            body: body.into(),
        }
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    pub fn body(&self) -> &Bytes {
        &self.body
    }

    /// Body as lossy UTF-8 text
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    /// Decode the body as JSON
    ///
    /// # Errors
    ///
    /// Returns `ClientError::Decode` if the body is not valid JSON for `T`
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, ClientError> {
        serde_json::from_slice(&self.body).map_err(|e| ClientError::Decode(e.to_string()))
    }
}
