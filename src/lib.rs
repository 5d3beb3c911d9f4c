//! fraudguard - session-aware client for the FraudGuard fraud-detection API
//!
//! # Architecture
//!
//! The library is organized into several modules:
//!
//! - [`client`] - Authenticated HTTP client with single-flight session refresh
//! - [`api`] - Typed wrappers for auth, profile, analysis, moderator and admin endpoints
//! - [`models`] - Request/response types and role checks
//! - [`config`] - Configuration management and settings
//! - [`error`] - Unified error type
//! - [`utils`] - Common utilities and helpers
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use fraudguard::client::{ApiClient, MemoryNavigator};
//! use fraudguard::config::Config;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::from_env()?;
//!     let client = ApiClient::new(&config, Arc::new(MemoryNavigator::default()))?;
//!     let result = client.content().analyze_text("You won a prize, send a fee").await?;
//!     println!("scam: {}", result.prediction.is_scam);
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod client;
pub mod commands;
pub mod config;
pub mod error;
pub mod models;
pub mod utils;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::client::{ApiClient, ApiRequest, AuthCoordinator, ClientError, Navigator};
    pub use crate::config::Config;
    pub use crate::error::{Error, ErrorCategory, FraudGuardErrorTrait, Result};
    pub use crate::models::{Pagination, User, UserRole};
}

pub use client::{ApiClient, ClientError};
