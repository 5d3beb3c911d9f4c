//! Common test utilities

use fraudguard::client::{ApiClient, MemoryNavigator};
use fraudguard::config::Config;
use serde_json::{json, Value};
use std::sync::Arc;
use wiremock::MockServer;

/// Path prefix the mock server is mounted under
pub const API_PREFIX: &str = "/api/v1";

/// Build a client pointed at `server`, starting on the dashboard route
pub fn client_for(server: &MockServer) -> (ApiClient, Arc<MemoryNavigator>) {
    let mut config = Config::default();
    config.api.base_url = format!("{}{API_PREFIX}", server.uri());
    config.api.request_timeout_secs = 5;

    let navigator = Arc::new(MemoryNavigator::new("/dashboard"));
    let client = ApiClient::new(&config, navigator.clone()).expect("client should build");
    (client, navigator)
}

/// Full mock path for an API endpoint
pub fn api_path(endpoint: &str) -> String {
    format!("{API_PREFIX}{endpoint}")
}

/// Number of requests the server received for `endpoint`
#[allow(dead_code)]
pub async fn hits(server: &MockServer, endpoint: &str) -> usize {
    let full = api_path(endpoint);
    server
        .received_requests()
        .await
        .unwrap_or_default()
        .iter()
        .filter(|r| r.url.path() == full)
        .count()
}

#[allow(dead_code)]
pub fn history_body() -> Value {
    json!({
        "checks": [{
            "id": 1,
            "title": "Prize notification",
            "content": "You won! Send 500 to claim",
            "danger_score": 91.0,
            "danger_level": "dangerous",
            "status": "completed",
            "processing_time_ms": 120,
            "created_at": "2024-05-01T10:00:00Z"
        }],
        "total": 1,
        "page": 1,
        "limit": 20
    })
}

#[allow(dead_code)]
pub fn user_body(id: u64, role: &str) -> Value {
    json!({
        "id": id,
        "username": "testuser",
        "email": "test@test.com",
        "role": role,
        "is_active": true
    })
}
