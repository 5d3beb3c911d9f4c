//! Current user's profile

use std::sync::Arc;

use super::send_for_message;
use crate::client::{ApiRequest, AuthCoordinator, ClientError};
use crate::models::{MessageResponse, UpdateProfileRequest, User};

#[derive(Clone)]
pub struct ProfileApi {
    coordinator: Arc<AuthCoordinator>,
}

impl ProfileApi {
    pub fn new(coordinator: Arc<AuthCoordinator>) -> Self {
        Self { coordinator }
    }

    pub async fn get_profile(&self) -> Result<User, ClientError> {
        self.coordinator.send_json(ApiRequest::get("/profile")).await
    }

    /// Update username and/or email
    ///
    /// # Errors
    ///
    /// Returns `ClientError::InvalidRequest` without calling the API when
    /// nothing would change
    pub async fn update_profile(&self, update: &UpdateProfileRequest) -> Result<User, ClientError> {
        if update.is_empty() {
            return Err(ClientError::InvalidRequest(
                "no profile changes to save".to_string(),
            ));
        }
        let request = ApiRequest::put("/profile").with_json(update)?;
        self.coordinator.send_json(request).await
    }

    pub async fn delete_account(&self) -> Result<MessageResponse, ClientError> {
        tracing::warn!("Deleting account");
        send_for_message(&self.coordinator, ApiRequest::delete("/account")).await
    }
}
