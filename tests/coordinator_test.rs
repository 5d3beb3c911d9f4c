//! Session refresh behavior against a mock API
//!
//! These tests drive the real reqwest transport through wiremock servers.

mod common;

use common::{api_path, client_for, history_body, hits, user_body};
use fraudguard::client::{ApiRequest, ClientError};
use fraudguard::config::Config;
use fraudguard::models::{LoginRequest, Pagination};
use fraudguard::ApiClient;
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn mount_expired_then_ok(server: &MockServer, endpoint: &str, expired: u64) {
    Mock::given(method("GET"))
        .and(path(api_path(endpoint)))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({"error": "token expired"})))
        .up_to_n_times(expired)
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path(api_path(endpoint)))
        .respond_with(ResponseTemplate::new(200).set_body_json(history_body()))
        .mount(server)
        .await;
}

/// Three simultaneous 401s share one delayed refresh and all succeed
#[tokio::test]
async fn test_concurrent_expiry_single_refresh() {
    let server = MockServer::start().await;
    mount_expired_then_ok(&server, "/analysis/history", 3).await;

    Mock::given(method("POST"))
        .and(path(api_path("/auth/refresh")))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({}))
                .set_delay(Duration::from_millis(300)),
        )
        .expect(1)
        .mount(&server)
        .await;

    let (client, navigator) = client_for(&server);
    let content = client.content();

    let (a, b, c) = tokio::join!(
        content.get_history(Pagination::default()),
        content.get_history(Pagination::default()),
        content.get_history(Pagination::default()),
    );

    for result in [a, b, c] {
        let history = result.expect("call should recover after refresh");
        assert_eq!(history.checks.len(), 1);
    }

    assert_eq!(hits(&server, "/auth/refresh").await, 1);
    assert_eq!(hits(&server, "/analysis/history").await, 6);
    assert!(navigator.redirects().is_empty());

    let stats = client.coordinator().stats();
    assert_eq!(stats.refreshes, 1);
    assert_eq!(stats.queued, 2);
    assert_eq!(stats.retried, 3);
}

/// A failed refresh rejects every waiting caller and redirects once
#[tokio::test]
async fn test_concurrent_expiry_refresh_fails() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(api_path("/analysis/history")))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path(api_path("/auth/refresh")))
        .respond_with(
            ResponseTemplate::new(401)
                .set_body_json(json!({"error": "refresh token expired"}))
                .set_delay(Duration::from_millis(300)),
        )
        .expect(1)
        .mount(&server)
        .await;

    let (client, navigator) = client_for(&server);
    let content = client.content();

    let (a, b, c) = tokio::join!(
        content.get_history(Pagination::default()),
        content.get_history(Pagination::default()),
        content.get_history(Pagination::default()),
    );

    for result in [a, b, c] {
        match result {
            Err(ClientError::RefreshFailed { reason }) => {
                assert!(reason.contains("refresh token expired"), "reason: {reason}");
            }
            other => panic!("expected RefreshFailed, got {other:?}"),
        }
    }

    assert_eq!(navigator.redirects(), vec!["/auth".to_string()]);
    assert!(!client.coordinator().refresh_in_flight());
    assert_eq!(client.coordinator().pending_waiters(), 0);
}

/// A 401 from login is returned as-is and never refreshes
#[tokio::test]
async fn test_login_401_is_not_refreshed() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(api_path("/auth/login")))
        .respond_with(
            ResponseTemplate::new(401).set_body_json(json!({"error": "Invalid credentials"})),
        )
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path(api_path("/auth/refresh")))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let (client, navigator) = client_for(&server);
    let result = client
        .auth()
        .login(&LoginRequest {
            login: "testuser".to_string(),
            password: "wrong".to_string(),
        })
        .await;

    match result {
        Err(ClientError::ExemptEndpoint { path, message }) => {
            assert_eq!(path, "/auth/login");
            assert_eq!(message, "Invalid credentials");
        }
        other => panic!("expected ExemptEndpoint, got {other:?}"),
    }
    assert!(navigator.redirects().is_empty());
}

/// A request that is still unauthorized after a refresh is not queued again
#[tokio::test]
async fn test_replay_is_attempted_once() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(api_path("/profile")))
        .respond_with(ResponseTemplate::new(401))
        .expect(2)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path(api_path("/auth/refresh")))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let (client, _) = client_for(&server);
    let result = client.profile().get_profile().await;

    assert!(
        matches!(result, Err(ClientError::SessionExpired { ref path }) if path == "/profile"),
        "got {result:?}"
    );
}

/// On a public route a 401 is surfaced without a refresh
#[tokio::test]
async fn test_public_route_401_is_not_refreshed() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(api_path("/profile")))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path(api_path("/auth/refresh")))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let (client, navigator) = client_for(&server);
    navigator.set_route("/");

    let result = client.profile().get_profile().await;
    assert!(matches!(
        result,
        Err(ClientError::UnauthenticatedContext { route: Some(ref r), .. }) if r == "/"
    ));
}

/// Explicit opt-out works regardless of the current route
#[tokio::test]
async fn test_opt_out_request_is_not_refreshed() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(api_path("/auth/logout")))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path(api_path("/auth/refresh")))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let (client, _) = client_for(&server);
    let result = client.auth().logout(Some("stale-token")).await;

    assert!(matches!(
        result,
        Err(ClientError::UnauthenticatedContext { route: None, .. })
    ));
}

/// Sequential expiries each get their own refresh cycle
#[tokio::test]
async fn test_sequential_expiries_refresh_each_time() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(api_path("/profile")))
        .respond_with(ResponseTemplate::new(401))
        .up_to_n_times(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path(api_path("/profile")))
        .respond_with(ResponseTemplate::new(200).set_body_json(user_body(4, "user")))
        .up_to_n_times(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path(api_path("/profile")))
        .respond_with(ResponseTemplate::new(401))
        .up_to_n_times(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path(api_path("/profile")))
        .respond_with(ResponseTemplate::new(200).set_body_json(user_body(5, "user")))
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path(api_path("/auth/refresh")))
        .respond_with(ResponseTemplate::new(200))
        .expect(2)
        .mount(&server)
        .await;

    let (client, _) = client_for(&server);

    let first = client.profile().get_profile().await.unwrap();
    let second = client.profile().get_profile().await.unwrap();

    assert_eq!(first.id, "4");
    assert_eq!(second.id, "5");
    assert_eq!(client.coordinator().stats().refreshes, 2);
}

/// Non-401 errors pass straight through
#[tokio::test]
async fn test_server_error_is_not_refreshed() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(api_path("/analysis/history")))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({"message": "db down"})))
        .expect(1)
        .mount(&server)
        .await;

    let (client, _) = client_for(&server);
    let result = client.send(ApiRequest::get("/analysis/history")).await;

    assert_eq!(
        result.unwrap_err(),
        ClientError::Http {
            status: 500,
            message: "db down".to_string()
        }
    );
    assert_eq!(hits(&server, "/auth/refresh").await, 0);
}

/// No response at all is reported as unreachable, never refreshed
#[tokio::test]
async fn test_connection_refused() {
    let mut config = Config::default();
    config.api.base_url = "http://localhost:1/api/v1".to_string();
    config.api.request_timeout_secs = 1;

    let navigator = Arc::new(fraudguard::client::MemoryNavigator::default());
    let client = ApiClient::new(&config, navigator.clone()).unwrap();

    let result = client.profile().get_profile().await;

    assert!(matches!(result, Err(ClientError::NetworkUnreachable(_))));
    assert_eq!(client.coordinator().stats().refreshes, 0);
    assert!(navigator.redirects().is_empty());
}

/// A response slower than the client timeout is unreachable, not a 401
#[tokio::test]
async fn test_timeout_is_not_refreshed() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(api_path("/profile")))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(3)))
        .mount(&server)
        .await;

    let mut config = Config::default();
    config.api.base_url = format!("{}/api/v1", server.uri());
    config.api.request_timeout_secs = 1;

    let navigator = Arc::new(fraudguard::client::MemoryNavigator::default());
    let client = ApiClient::new(&config, navigator.clone()).unwrap();

    let result = client.profile().get_profile().await;

    match result {
        Err(ClientError::NetworkUnreachable(message)) => {
            assert!(message.starts_with("timed out"), "message: {message}")
        }
        other => panic!("expected NetworkUnreachable, got {other:?}"),
    }
    assert_eq!(hits(&server, "/auth/refresh").await, 0);
    assert!(navigator.redirects().is_empty());
}
