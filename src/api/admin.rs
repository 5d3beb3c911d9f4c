//! User administration

use serde_json::json;
use std::sync::Arc;

use super::paged;
use crate::client::{ApiRequest, AuthCoordinator, ClientError};
use crate::models::{Pagination, User, UserListResponse, UserRole};

#[derive(Clone)]
pub struct AdminApi {
    coordinator: Arc<AuthCoordinator>,
}

impl AdminApi {
    pub fn new(coordinator: Arc<AuthCoordinator>) -> Self {
        Self { coordinator }
    }

    pub async fn get_users(&self, pagination: Pagination) -> Result<UserListResponse, ClientError> {
        let request = paged(ApiRequest::get("/admin/users"), pagination);
        self.coordinator.send_json(request).await
    }

    pub async fn get_user(&self, id: &str) -> Result<User, ClientError> {
        self.coordinator
            .send_json(ApiRequest::get(user_path(id)?))
            .await
    }

    pub async fn change_user_role(&self, id: &str, role: UserRole) -> Result<User, ClientError> {
        tracing::info!(user_id = %id, role = %role, "Changing user role");
        let request =
            ApiRequest::put(format!("{}/role", user_path(id)?)).with_body(json!({ "role": role }));
        self.coordinator.send_json(request).await
    }

    pub async fn change_user_status(&self, id: &str, is_active: bool) -> Result<User, ClientError> {
        tracing::info!(user_id = %id, is_active, "Changing user status");
        let request = ApiRequest::put(format!("{}/status", user_path(id)?))
            .with_body(json!({ "is_active": is_active }));
        self.coordinator.send_json(request).await
    }
}

/// Ids are interpolated into the path, so only plain tokens are accepted
fn user_path(id: &str) -> Result<String, ClientError> {
    let valid = !id.is_empty()
        && id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
    if !valid {
        return Err(ClientError::InvalidRequest(format!("invalid user id: {id:?}")));
    }
    Ok(format!("/admin/users/{id}"))
}
