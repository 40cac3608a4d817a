//! Integration tests for `PulseClient` using wiremock HTTP mocks.

use pulse_client::{ClientError, PulseClient};
use pulse_core::{Sentiment, StatusSource};
use pulse_stream::{RecordSource, StreamError};
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn test_client(base_url: &str) -> PulseClient {
    PulseClient::with_base_url(base_url, 5)
        .expect("client construction should not fail")
        .with_retry(2, 0)
}

fn envelope(data: serde_json::Value) -> serde_json::Value {
    json!({
        "data": data,
        "meta": { "request_id": "req_test", "timestamp": "2024-05-01T12:00:00Z" }
    })
}

fn error_body(code: &str, message: &str) -> serde_json::Value {
    json!({
        "error": { "code": code, "message": message },
        "meta": { "request_id": "req_test", "timestamp": "2024-05-01T12:00:00Z" }
    })
}

#[tokio::test]
async fn fetch_records_decodes_batch() {
    let server = MockServer::start().await;

    let body = envelope(json!({
        "records": [
            {
                "id": "1",
                "text": "Loving #rustlang today",
                "author": "ferris",
                "createdAt": "2024-05-01T11:59:00Z",
                "sentiment": "positive",
                "sentimentScore": 0.8,
                "isSynthetic": false
            },
            {
                "id": 42,
                "text": "meh",
                "createdAt": 1_714_564_680_000_i64,
                "isSynthetic": true
            }
        ],
        "usingFallbackData": true
    }));

    Mock::given(method("GET"))
        .and(path("/api/v1/records"))
        .and(query_param("term", "rust lang"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&body))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let batch = client.fetch_records("rust lang").await.expect("batch");

    assert_eq!(batch.len(), 2);
    assert!(batch.using_fallback_data);
    assert_eq!(batch.records[0].sentiment, Sentiment::Positive);
    assert_eq!(batch.records[1].id, "42");
    assert_eq!(batch.records[1].sentiment, Sentiment::Neutral);
    assert_eq!(batch.records[1].author, "");
}

#[tokio::test]
async fn bearer_token_is_sent_when_configured() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/stream/status"))
        .and(header("authorization", "Bearer secret-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(envelope(json!({
            "isActive": false,
            "searchTerm": null,
            "source": "persisted"
        }))))
        .expect(1)
        .mount(&server)
        .await;

    let client = test_client(&server.uri()).with_api_token("secret-token");
    let status = client.stream_status().await.expect("status");
    assert!(!status.is_active);
    assert_eq!(status.source, StatusSource::Persisted);
}

#[tokio::test]
async fn start_stream_posts_term() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/v1/stream/start"))
        .and(body_json(json!({ "term": "postgres" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(envelope(json!({
            "searchTerm": "postgres",
            "isActive": true,
            "startedAt": "2024-05-01T12:00:00Z",
            "stoppedAt": null
        }))))
        .expect(1)
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let state = client.start_stream("postgres").await.expect("state");
    assert!(state.is_active);
    assert_eq!(state.active_term(), Some("postgres"));
}

#[tokio::test]
async fn stop_stream_returns_idle_state() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/v1/stream/stop"))
        .respond_with(ResponseTemplate::new(200).set_body_json(envelope(json!({
            "searchTerm": "postgres",
            "isActive": false,
            "startedAt": "2024-05-01T12:00:00Z",
            "stoppedAt": "2024-05-01T12:05:00Z"
        }))))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let state = client.stop_stream().await.expect("state");
    assert!(!state.is_active);
    assert_eq!(state.active_term(), None);
    assert!(state.stopped_at.is_some());
}

#[tokio::test]
async fn validation_error_surfaces_code_without_retry() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/records"))
        .respond_with(
            ResponseTemplate::new(400)
                .set_body_json(error_body("validation_error", "search term is required")),
        )
        .expect(1)
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let err = client.fetch_records("  ").await.unwrap_err();
    match err {
        ClientError::Api {
            status,
            code,
            message,
        } => {
            assert_eq!(status, 400);
            assert_eq!(code, "validation_error");
            assert_eq!(message, "search term is required");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn transient_server_error_is_retried() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/records"))
        .respond_with(
            ResponseTemplate::new(503).set_body_json(error_body("store_unavailable", "down")),
        )
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/v1/records"))
        .respond_with(ResponseTemplate::new(200).set_body_json(envelope(json!({
            "records": [],
            "usingFallbackData": false
        }))))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let batch = client.fetch_records("rust").await.expect("retry should succeed");
    assert!(batch.is_empty());
}

#[tokio::test]
async fn failed_start_is_not_retried() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/v1/stream/start"))
        .respond_with(
            ResponseTemplate::new(503).set_body_json(error_body("store_unavailable", "down")),
        )
        .expect(1)
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let err = client.start_stream("rust").await.unwrap_err();
    assert!(matches!(err, ClientError::Api { status: 503, .. }), "got {err:?}");
}

#[tokio::test]
async fn malformed_body_is_a_deserialize_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/records"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let err = client.fetch_records("rust").await.unwrap_err();
    assert!(matches!(err, ClientError::Deserialize { .. }), "got {err:?}");
}

#[tokio::test]
async fn degraded_health_is_reported_not_raised() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/health"))
        .respond_with(ResponseTemplate::new(503).set_body_json(envelope(json!({
            "status": "degraded",
            "database": "unreachable"
        }))))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let report = client.health().await.expect("report");
    assert!(!report.is_ok());
    assert_eq!(report.database, "unreachable");
}

#[tokio::test]
async fn record_source_maps_failures_to_fetch_errors() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/records"))
        .respond_with(ResponseTemplate::new(401).set_body_json(error_body(
            "unauthorized",
            "missing or invalid bearer token",
        )))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let err = client.fetch_batch("rust").await.unwrap_err();
    assert!(matches!(err, StreamError::Fetch(_)), "got {err:?}");
}
