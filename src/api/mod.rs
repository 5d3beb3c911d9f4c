//! Typed wrappers over the FraudGuard REST endpoints
//!
//! Each group holds a shared handle to the [`AuthCoordinator`], so every call
//! takes part in the same session refresh protocol.
//!
//! [`AuthCoordinator`]: crate::client::AuthCoordinator

pub mod admin;
pub mod auth;
pub mod content;
pub mod moderator;
pub mod profile;

pub use admin::AdminApi;
pub use auth::AuthApi;
pub use content::{ContentApi, MAX_BATCH_SIZE};
pub use moderator::ModeratorApi;
pub use profile::ProfileApi;

use crate::client::{ApiRequest, AuthCoordinator, ClientError};
use crate::models::{MessageResponse, Pagination};

fn paged(request: ApiRequest, pagination: Pagination) -> ApiRequest {
    request
        .with_query("page", pagination.page)
        .with_query("limit", pagination.limit)
}

/// Send a request whose reply is an optional `{"message": ...}` acknowledgement
async fn send_for_message(
    coordinator: &AuthCoordinator,
    request: ApiRequest,
) -> Result<MessageResponse, ClientError> {
    let response = coordinator.send(request).await?;
    if response.body().is_empty() {
        return Ok(MessageResponse::default());
    }
    response.json()
}
