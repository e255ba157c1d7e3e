use super::*;

use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use connector_protocols::PROTOCOL_SIGNATURE;

fn candidate_for(server: &MockServer) -> ServerCandidate {
    let addr = server.address();
    ServerCandidate::new(addr.ip().to_string(), addr.port())
}

#[tokio::test]
async fn test_fetch_identity_success() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/.identity"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "signature": PROTOCOL_SIGNATURE,
            "name": "browser-tools",
            "version": "1.2.0",
        })))
        .mount(&server)
        .await;

    let transport = HttpTransport::new().unwrap();
    let payload = transport
        .fetch_identity(&candidate_for(&server), Duration::from_secs(1))
        .await
        .unwrap();
    assert!(payload.is_signed());
    assert_eq!(payload.name.as_deref(), Some("browser-tools"));
}

#[tokio::test]
async fn test_fetch_identity_error_status() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/.identity"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let transport = HttpTransport::new().unwrap();
    let err = transport
        .fetch_identity(&candidate_for(&server), Duration::from_secs(1))
        .await
        .unwrap_err();
    assert!(matches!(err, TransportError::Status(404)));
}

#[tokio::test]
async fn test_fetch_identity_invalid_body() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/.identity"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>not json</html>"))
        .mount(&server)
        .await;

    let transport = HttpTransport::new().unwrap();
    let err = transport
        .fetch_identity(&candidate_for(&server), Duration::from_secs(1))
        .await
        .unwrap_err();
    assert!(matches!(err, TransportError::InvalidBody(_)));
}

#[tokio::test]
async fn test_fetch_identity_timeout() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/.identity"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!({"signature": PROTOCOL_SIGNATURE}))
                .set_delay(Duration::from_millis(500)),
        )
        .mount(&server)
        .await;

    let transport = HttpTransport::new().unwrap();
    let err = transport
        .fetch_identity(&candidate_for(&server), Duration::from_millis(50))
        .await
        .unwrap_err();
    assert!(matches!(err, TransportError::Timeout));
}

#[tokio::test]
async fn test_fetch_identity_connection_refused() {
    // Nothing listens on the mock server's port once it is dropped.
    let server = MockServer::start().await;
    let candidate = candidate_for(&server);
    drop(server);

    let transport = HttpTransport::new().unwrap();
    let err = transport
        .fetch_identity(&candidate, Duration::from_secs(1))
        .await
        .unwrap_err();
    assert!(matches!(err, TransportError::Connect(_)));
}

#[tokio::test]
async fn test_post_current_url_success() {
    let server = MockServer::start().await;
    let payload = CurrentUrlPayload {
        url: "https://example.com".to_string(),
        tab_id: 7,
        timestamp: 1_700_000_000_000,
        source: "tab_url_change".to_string(),
    };
    Mock::given(method("POST"))
        .and(path("/current-url"))
        .and(body_json(&payload))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"ok": true})))
        .expect(1)
        .mount(&server)
        .await;

    let transport = HttpTransport::new().unwrap();
    transport
        .post_current_url(&candidate_for(&server), &payload, Duration::from_secs(1))
        .await
        .unwrap();
}

#[tokio::test]
async fn test_post_current_url_error_status() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/current-url"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let transport = HttpTransport::new().unwrap();
    let payload = CurrentUrlPayload {
        url: "https://example.com".to_string(),
        tab_id: 7,
        timestamp: 1_700_000_000_000,
        source: "tab_url_change".to_string(),
    };
    let err = transport
        .post_current_url(&candidate_for(&server), &payload, Duration::from_secs(1))
        .await
        .unwrap_err();
    assert!(matches!(err, TransportError::Status(500)));
}
