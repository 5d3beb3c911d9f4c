//! Unified error handling for the fraudguard crate
//!
//! This module provides a unified error type that consolidates the client
//! taxonomy and the ambient failures (config, I/O, JSON) into a single
//! `Error` enum, while keeping [`ClientError`] available for callers that need
//! to match on individual session outcomes.
//!
//! # Usage
//!
//! ```rust,ignore
//! use fraudguard::error::{Error, ErrorCategory, FraudGuardErrorTrait};
//!
//! fn handle_error(err: Error) {
//!     if err.category() == ErrorCategory::Auth {
//!         eprintln!("Please sign in again: {}", err.user_message());
//!     }
//! }
//! ```

use std::io;
use thiserror::Error;

pub use crate::client::ClientError;

/// Common trait for all fraudguard error types
pub trait FraudGuardErrorTrait: std::error::Error {
    /// Check if this error is recoverable (can be retried)
    fn is_recoverable(&self) -> bool;

    /// Message suitable for showing to an end user
    fn user_message(&self) -> String;

    /// Get the error category for handling strategies
    fn category(&self) -> ErrorCategory;
}

/// Classification of errors for handling strategies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    /// No response from the API
    Network,
    /// Session or credential problems
    Auth,
    /// API answered with an error status
    Api,
    /// Response or input could not be (de)serialized
    Parsing,
    /// Rejected locally before sending
    Validation,
    /// Configuration errors
    Config,
    /// Local I/O
    Storage,
    /// Other/unknown errors
    Other,
}

impl FraudGuardErrorTrait for ClientError {
    fn is_recoverable(&self) -> bool {
        ClientError::is_recoverable(self)
    }

    fn user_message(&self) -> String {
        match self {
            Self::NetworkUnreachable(_) => {
                "Could not reach the server. Check your connection.".to_string()
            }
            Self::RefreshFailed { .. } | Self::SessionExpired { .. } => {
                "Your session has expired. Please sign in again.".to_string()
            }
            Self::ExemptEndpoint { message, .. } => message.clone(),
            Self::UnauthenticatedContext { .. } => "Please sign in to continue.".to_string(),
            Self::Http { message, .. } => message.clone(),
            Self::Decode(_) => "The server sent an unexpected response.".to_string(),
            Self::InvalidRequest(msg) => msg.clone(),
            Self::Init(msg) => format!("Client setup failed: {msg}"),
        }
    }

    fn category(&self) -> ErrorCategory {
        match self {
            Self::NetworkUnreachable(_) => ErrorCategory::Network,
            Self::ExemptEndpoint { .. }
            | Self::UnauthenticatedContext { .. }
            | Self::SessionExpired { .. }
            | Self::RefreshFailed { .. } => ErrorCategory::Auth,
            Self::Http { .. } => ErrorCategory::Api,
            Self::Decode(_) => ErrorCategory::Parsing,
            Self::InvalidRequest(_) => ErrorCategory::Validation,
            Self::Init(_) => ErrorCategory::Config,
        }
    }
}

/// Unified error type for the fraudguard crate
#[derive(Error, Debug)]
pub enum Error {
    /// Errors from the authenticated client
    #[error("Client error: {0}")]
    Client(#[from] ClientError),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration errors
    #[error("Config error: {0}")]
    Config(String),

    /// Anything else, already formatted with its causes
    #[error("{0}")]
    Other(String),
}

impl FraudGuardErrorTrait for Error {
    fn is_recoverable(&self) -> bool {
        match self {
            Self::Client(e) => e.is_recoverable(),
            Self::Io(_) => true,
            Self::Json(_) | Self::Config(_) | Self::Other(_) => false,
        }
    }

    fn user_message(&self) -> String {
        match self {
            Self::Client(e) => e.user_message(),
            other => other.to_string(),
        }
    }

    fn category(&self) -> ErrorCategory {
        match self {
            Self::Client(e) => e.category(),
            Self::Io(_) => ErrorCategory::Storage,
            Self::Json(_) => ErrorCategory::Parsing,
            Self::Config(_) => ErrorCategory::Config,
            Self::Other(_) => ErrorCategory::Other,
        }
    }
}

impl Error {
    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }
}

// Conversion from anyhow::Error
impl From<anyhow::Error> for Error {
    fn from(err: anyhow::Error) -> Self {
        Self::Other(format!("{err:#}"))
    }
}

/// Result type alias using the unified Error type
pub type Result<T> = std::result::Result<T, Error>;
