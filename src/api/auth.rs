//! Login, registration and logout

use serde_json::json;
use std::sync::Arc;

use crate::client::request::{LOGIN_PATH, REFRESH_PATH, REGISTER_PATH};
use crate::client::{ApiRequest, AuthCoordinator, ClientError};
use crate::models::{AuthResponse, LoginRequest, RegisterRequest};

pub const LOGOUT_PATH: &str = "/auth/logout";

#[derive(Clone)]
pub struct AuthApi {
    coordinator: Arc<AuthCoordinator>,
}

impl AuthApi {
    pub fn new(coordinator: Arc<AuthCoordinator>) -> Self {
        Self { coordinator }
    }

    /// Sign in; the API sets the session cookie on success
    pub async fn login(&self, request: &LoginRequest) -> Result<AuthResponse, ClientError> {
        tracing::info!(login = %request.login, "Signing in");
        let request = ApiRequest::post(LOGIN_PATH).with_json(request)?;
        self.coordinator.send_json(request).await
    }

    pub async fn register(&self, request: &RegisterRequest) -> Result<AuthResponse, ClientError> {
        tracing::info!(username = %request.username, "Registering account");
        let request = ApiRequest::post(REGISTER_PATH).with_json(request)?;
        self.coordinator.send_json(request).await
    }

    pub async fn logout(&self, refresh_token: Option<&str>) -> Result<(), ClientError> {
        let request = ApiRequest::post(LOGOUT_PATH)
            .with_body(json!({ "refresh_token": refresh_token }))
            .without_auto_refresh();
        self.coordinator.send(request).await?;
        Ok(())
    }

    /// Exchange an explicit refresh token.
    ///
    /// This is the user-driven variant; the coordinator's own refresh relies
    /// on the session cookie instead.
    pub async fn refresh_token(&self, refresh_token: &str) -> Result<AuthResponse, ClientError> {
        let request =
            ApiRequest::post(REFRESH_PATH).with_body(json!({ "refresh_token": refresh_token }));
        self.coordinator.send_json(request).await
    }
}
