//! Error taxonomy of the authenticated client
//!
//! A single refresh outcome is delivered to every queued caller, so
//! [`ClientError`] is `Clone` and carries only owned strings.

use serde::Deserialize;
use thiserror::Error;

use super::request::ApiResponse;

const MAX_MESSAGE_LEN: usize = 512;

/// Errors surfaced by [`AuthCoordinator::send`](super::AuthCoordinator::send)
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ClientError {
    /// 401 from login, registration or refresh itself
    #[error("Authentication rejected by {path}: {message}")]
    ExemptEndpoint { path: String, message: String },

    /// 401 while on a public route, or on a request that opted out of refresh
    #[error("Not authenticated for {path} (route: {})", .route.as_deref().unwrap_or("n/a"))]
    UnauthenticatedContext { path: String, route: Option<String> },

    /// 401 on a request that was already replayed once
    #[error("Session expired for {path}")]
    SessionExpired { path: String },

    /// The refresh call itself failed
    #[error("Session refresh failed: {reason}")]
    RefreshFailed { reason: String },

    /// No response was received
    #[error("Network unreachable: {0}")]
    NetworkUnreachable(String),

    /// Any other non-success status
    #[error("HTTP error ({status}): {message}")]
    Http { status: u16, message: String },

    /// Response body did not match the expected shape
    #[error("Decode error: {0}")]
    Decode(String),

    /// Rejected locally before any request was sent
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Client could not be constructed
    #[error("Initialization error: {0}")]
    Init(String),
}

/// Error body shape used by the API: `{"error": "..."}` or `{"message": "..."}`
#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: Option<String>,
    message: Option<String>,
}

impl ClientError {
    /// Build an `Http` error from a non-success response
    pub fn from_response(response: &ApiResponse) -> Self {
        Self::Http {
            status: response.status().as_u16(),
            message: error_message(response),
        }
    }

    /// Whether retrying the same call later may succeed
    pub fn is_recoverable(&self) -> bool {
        match self {
            Self::NetworkUnreachable(_) => true,
            Self::Http { status, .. } => matches!(status, 429 | 500 | 502 | 503 | 504),
            _ => false,
        }
    }

    /// Whether the caller has to sign in again
    pub fn requires_login(&self) -> bool {
        matches!(
            self,
            Self::RefreshFailed { .. }
                | Self::SessionExpired { .. }
                | Self::UnauthenticatedContext { .. }
        )
    }

    /// HTTP status attached to the error, when one was received
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Http { status, .. } => Some(*status),
            Self::ExemptEndpoint { .. }
            | Self::UnauthenticatedContext { .. }
            | Self::SessionExpired { .. } => Some(401),
            _ => None,
        }
    }
}

/// Extract the human-readable message from an error response
pub(crate) fn error_message(response: &ApiResponse) -> String {
    if let Ok(body) = response.json::<ErrorBody>() {
        if let Some(message) = body.error.or(body.message) {
            return message;
        }
    }

    let text = response.text();
    if text.trim().is_empty() {
        return response
            .status()
            .canonical_reason()
            .unwrap_or("unknown error")
            .to_string();
    }

    crate::utils::truncate_text(text.trim(), MAX_MESSAGE_LEN)
}
