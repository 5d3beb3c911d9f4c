//! Moderator views across all users

use std::sync::Arc;

use super::paged;
use crate::client::{ApiRequest, AuthCoordinator, ClientError};
use crate::models::{GlobalStatsResponse, HistoryResponse, Pagination};

#[derive(Clone)]
pub struct ModeratorApi {
    coordinator: Arc<AuthCoordinator>,
}

impl ModeratorApi {
    pub fn new(coordinator: Arc<AuthCoordinator>) -> Self {
        Self { coordinator }
    }

    pub async fn get_all_checks(
        &self,
        pagination: Pagination,
    ) -> Result<HistoryResponse, ClientError> {
        let request = paged(ApiRequest::get("/analysis/all"), pagination);
        self.coordinator.send_json(request).await
    }

    pub async fn get_global_stats(&self) -> Result<GlobalStatsResponse, ClientError> {
        self.coordinator
            .send_json(ApiRequest::get("/analysis/global-stats"))
            .await
    }
}
