//! Authenticated HTTP client for the FraudGuard API
//!
//! # Architecture
//!
//! ```text
//! ┌───────────────────────────────────────────┐
//! │                 ApiClient                 │
//! │   auth() profile() content() admin() ...  │
//! └─────────────────────┬─────────────────────┘
//!                       │ ApiRequest
//! ┌─────────────────────▼─────────────────────┐
//! │              AuthCoordinator              │
//! │  - 401 classification                     │
//! │  - single-flight refresh + waiter queue   │
//! │  - one replay per request                 │
//! └──────────┬─────────────────────┬──────────┘
//!            │                     │
//! ┌──────────▼─────────┐ ┌─────────▼──────────┐
//! │     Transport      │ │     Navigator      │
//! │  (reqwest, cookies)│ │ (route, redirect)  │
//! └────────────────────┘ └────────────────────┘
//! ```

pub mod coordinator;
pub mod error;
pub mod navigation;
pub mod request;
pub mod transport;

use std::sync::Arc;

pub use coordinator::{AuthCoordinator, RefreshStats};
pub use error::ClientError;
pub use navigation::{MemoryNavigator, Navigator};
pub use request::{ApiRequest, ApiResponse};
pub use transport::{ReqwestTransport, Transport, TransportError};

use crate::api::{AdminApi, AuthApi, ContentApi, ModeratorApi, ProfileApi};
use crate::config::Config;

/// Entry point bundling the coordinator with the typed endpoint groups
#[derive(Clone)]
pub struct ApiClient {
    coordinator: Arc<AuthCoordinator>,
    base_url: String,
}

impl ApiClient {
    /// Build a client on the production transport
    ///
    /// # Errors
    ///
    /// Returns `Error::Config` if the configuration is invalid, or
    /// `Error::Client` if the HTTP client cannot be created
    pub fn new(config: &Config, navigator: Arc<dyn Navigator>) -> crate::error::Result<Self> {
        config
            .validate()
            .map_err(|e| crate::error::Error::config(format!("{e:#}")))?;

        let transport = ReqwestTransport::new(&config.api)?;
        Ok(Self::with_transport(config, Arc::new(transport), navigator))
    }

    /// Build a client on a custom transport
    pub fn with_transport(
        config: &Config,
        transport: Arc<dyn Transport>,
        navigator: Arc<dyn Navigator>,
    ) -> Self {
        let coordinator = AuthCoordinator::new(transport, navigator, config.session.clone());
        Self {
            coordinator: Arc::new(coordinator),
            base_url: config.api.base_url.clone(),
        }
    }

    pub fn coordinator(&self) -> &Arc<AuthCoordinator> {
        &self.coordinator
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Send a raw request through the coordinator
    pub async fn send(&self, request: ApiRequest) -> Result<ApiResponse, ClientError> {
        self.coordinator.send(request).await
    }

    pub fn auth(&self) -> AuthApi {
        AuthApi::new(Arc::clone(&self.coordinator))
    }

    pub fn profile(&self) -> ProfileApi {
        ProfileApi::new(Arc::clone(&self.coordinator))
    }

    pub fn content(&self) -> ContentApi {
        ContentApi::new(Arc::clone(&self.coordinator))
    }

    pub fn moderator(&self) -> ModeratorApi {
        ModeratorApi::new(Arc::clone(&self.coordinator))
    }

    pub fn admin(&self) -> AdminApi {
        AdminApi::new(Arc::clone(&self.coordinator))
    }

    /// Public URL of a stored file, see [`crate::utils::file_url`]
    pub fn file_url(&self, path: &str) -> Option<String> {
        crate::utils::file_url(&self.base_url, path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_creation() {
        let client = ApiClient::new(&Config::default(), Arc::new(MemoryNavigator::default()));
        assert!(client.is_ok());
    }

    #[test]
    fn test_invalid_config_rejected() {
        let mut config = Config::default();
        config.api.request_timeout_secs = 0;
        let client = ApiClient::new(&config, Arc::new(MemoryNavigator::default()));
        assert!(matches!(client, Err(crate::error::Error::Config(_))));
    }

    #[test]
    fn test_file_url_uses_base() {
        let client =
            ApiClient::new(&Config::default(), Arc::new(MemoryNavigator::default())).unwrap();
        assert_eq!(
            client.file_url("images/a.jpg").as_deref(),
            Some("http://localhost:8080/api/v1/files/images/a.jpg")
        );
    }
}
