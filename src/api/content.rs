//! Content analysis and analysis history

use serde_json::json;
use std::sync::Arc;

use super::paged;
use crate::client::{ApiRequest, AuthCoordinator, ClientError};
use crate::models::{
    BatchAnalysisResponse, HistoryCheck, HistoryResponse, Pagination, TextAnalysisResponse,
};

/// Largest batch the API accepts in one call
pub const MAX_BATCH_SIZE: usize = 100;

#[derive(Clone)]
pub struct ContentApi {
    coordinator: Arc<AuthCoordinator>,
}

impl ContentApi {
    pub fn new(coordinator: Arc<AuthCoordinator>) -> Self {
        Self { coordinator }
    }

    /// Analyze a single text
    pub async fn analyze_text(&self, text: &str) -> Result<TextAnalysisResponse, ClientError> {
        if text.trim().is_empty() {
            return Err(ClientError::InvalidRequest(
                "text to analyze is empty".to_string(),
            ));
        }

        let request = ApiRequest::post("/analysis/text").with_body(json!({ "text": text }));
        let response: TextAnalysisResponse = self.coordinator.send_json(request).await?;

        tracing::debug!(
            check_id = response.check_id,
            label = %response.prediction.label,
            is_scam = response.prediction.is_scam,
            "Text analyzed"
        );
        Ok(response)
    }

    /// Analyze up to [`MAX_BATCH_SIZE`] texts in one call
    pub async fn analyze_batch<S: AsRef<str>>(
        &self,
        texts: &[S],
    ) -> Result<BatchAnalysisResponse, ClientError> {
        if texts.is_empty() {
            return Err(ClientError::InvalidRequest("batch is empty".to_string()));
        }
        if texts.len() > MAX_BATCH_SIZE {
            return Err(ClientError::InvalidRequest(format!(
                "at most {MAX_BATCH_SIZE} texts per batch, got {}",
                texts.len()
            )));
        }

        let texts: Vec<&str> = texts.iter().map(AsRef::as_ref).collect();
        let request = ApiRequest::post("/analysis/batch").with_body(json!({ "texts": texts }));
        self.coordinator.send_json(request).await
    }

    pub async fn get_history(&self, pagination: Pagination) -> Result<HistoryResponse, ClientError> {
        let request = paged(ApiRequest::get("/analysis/history"), pagination);
        self.coordinator.send_json(request).await
    }

    /// Walk every history page and return all of the user's checks
    pub async fn get_full_history(&self, page_size: u32) -> Result<Vec<HistoryCheck>, ClientError> {
        let page_size = page_size.max(1);
        let mut checks = Vec::new();
        let mut page = 1;

        loop {
            let history = self.get_history(Pagination::new(page, page_size)).await?;
            let received = history.checks.len();
            checks.extend(history.checks);

            if received == 0 || checks.len() as u64 >= history.total {
                break;
            }
            page += 1;
        }

        tracing::debug!(checks = checks.len(), pages = page, "History collected");
        Ok(checks)
    }
}
