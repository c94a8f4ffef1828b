use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use pushrelay_config::{AppConfig, FcmConfig, ServerConfig};
use pushrelay_fcm::auth::AccessTokenProvider;
use pushrelay_fcm::client::{FcmClient, FcmError};
use pushrelay_fcm::routes::routes_with_client;
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

struct StaticTokenProvider;

#[async_trait]
impl AccessTokenProvider for StaticTokenProvider {
    async fn access_token(&self) -> Result<String, FcmError> {
        Ok("mock-access-token".to_string())
    }

    fn project_id(&self) -> &str {
        "test-project-123"
    }
}

// Helper function to create a mock AppConfig for testing
fn create_mock_config() -> Arc<AppConfig> {
    Arc::new(AppConfig {
        server: ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 8080,
        },
        use_fcm: true,
        fcm: Some(FcmConfig {
            credentials_file: Some("test-credentials.json".to_string()),
            scopes: vec!["https://www.googleapis.com/auth/firebase.messaging".to_string()],
            endpoint_url: None,
        }),
    })
}

fn test_app(server_uri: &str) -> Router {
    let client = FcmClient::new(
        Arc::new(StaticTokenProvider),
        Some(format!("{}/v1/projects/%s/messages:send", server_uri)),
    );
    routes_with_client(create_mock_config(), client)
}

async fn post_json(app: Router, uri: &str, body: Value) -> (StatusCode, Value) {
    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(uri)
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();

    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let value = serde_json::from_slice(&bytes)
        .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()));
    (status, value)
}

#[tokio::test]
async fn send_dispatches_once_per_token_and_aggregates() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/projects/test-project-123/messages:send"))
        .and(header("authorization", "Bearer mock-access-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "name": "projects/test-project-123/messages/1"
        })))
        .expect(2)
        .mount(&server)
        .await;

    let (status, body) = post_json(
        test_app(&server.uri()),
        "/send",
        json!({
            "tokens": ["device-token-a", "device-token-b"],
            "notification": { "title": "Hello", "body": "World" }
        }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success_count"], 2);
    assert_eq!(body["failure_count"], 0);
    assert!(
        body.get("failed_tokens").is_none(),
        "failed_tokens must be absent when nothing failed, got: {}",
        body
    );
}

#[tokio::test]
async fn one_token_failure_does_not_stop_the_others() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(body_partial_json(json!({
            "message": { "token": "bad-token" }
        })))
        .respond_with(
            ResponseTemplate::new(404).set_body_string(r#"{"error":"UNREGISTERED"}"#),
        )
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(body_partial_json(json!({
            "message": { "token": "good-token" }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "name": "projects/test-project-123/messages/2"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let (status, body) = post_json(
        test_app(&server.uri()),
        "/send",
        json!({
            "tokens": ["bad-token", "good-token"],
            "notification": { "title": "Hello", "body": "World" }
        }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success_count"], 1);
    assert_eq!(body["failure_count"], 1);

    let failed = body["failed_tokens"].as_array().unwrap();
    assert_eq!(failed.len(), 1);
    assert_eq!(failed[0]["token"], "bad-token");
    let error = failed[0]["error"].as_str().unwrap();
    assert!(error.contains("FCM error 404"), "unexpected error: {}", error);
    assert!(error.contains("UNREGISTERED"), "unexpected error: {}", error);
}

#[tokio::test]
async fn empty_token_list_is_a_client_error() {
    let server = MockServer::start().await;

    let (status, body) = post_json(
        test_app(&server.uri()),
        "/send",
        json!({
            "tokens": [],
            "notification": { "title": "Hello", "body": "World" }
        }),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    let message = body["error"]["message"].as_str().unwrap();
    assert!(
        message.contains("Tokens list cannot be empty"),
        "unexpected message: {}",
        message
    );
}

#[tokio::test]
async fn missing_notification_is_a_client_error() {
    let server = MockServer::start().await;

    let (status, _body) = post_json(
        test_app(&server.uri()),
        "/send",
        json!({ "tokens": ["device-token-a"] }),
    )
    .await;

    assert!(
        status.is_client_error(),
        "expected a 4xx for a malformed body, got: {}",
        status
    );
}

#[tokio::test]
async fn broadcast_sends_one_call_for_the_condition() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/projects/test-project-123/messages:send"))
        .and(body_partial_json(json!({
            "message": {
                "condition": "'news' in topics",
                "data": { "article_id": "123456" }
            }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "name": "projects/test-project-123/messages/3"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let (status, body) = post_json(
        test_app(&server.uri()),
        "/broadcast",
        json!({
            "condition": "'news' in topics",
            "notification": { "title": "Breaking", "body": "Something happened" },
            "data": { "article_id": "123456" }
        }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body["message"],
        "Broadcast message successfully sent to FCM for topic condition."
    );
}

#[tokio::test]
async fn broadcast_upstream_failure_maps_to_500() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(
            ResponseTemplate::new(503).set_body_string(r#"{"error":"quota exceeded"}"#),
        )
        .expect(1)
        .mount(&server)
        .await;

    let (status, body) = post_json(
        test_app(&server.uri()),
        "/broadcast",
        json!({
            "condition": "'news' in topics",
            "notification": { "title": "Breaking", "body": "Something happened" }
        }),
    )
    .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], "Failed to send broadcast");
    let details = body["details"].as_str().unwrap();
    assert!(details.contains("FCM error 503"), "unexpected details: {}", details);
    assert!(details.contains("quota exceeded"), "unexpected details: {}", details);
}

#[tokio::test]
async fn empty_condition_is_a_client_error() {
    let server = MockServer::start().await;

    let (status, body) = post_json(
        test_app(&server.uri()),
        "/broadcast",
        json!({
            "condition": "",
            "notification": { "title": "Breaking", "body": "Something happened" }
        }),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    let message = body["error"]["message"].as_str().unwrap();
    assert!(
        message.contains("Condition cannot be empty"),
        "unexpected message: {}",
        message
    );
}
