use super::*;

use async_trait::async_trait;
use parking_lot::Mutex;

use connector_protocols::{IdentityPayload, TransportError};

/// Transport whose POST results are scripted in order; later calls repeat the
/// last script entry.
struct PostScriptTransport {
    script: Mutex<Vec<Result<(), ()>>>,
    posts: Mutex<Vec<CurrentUrlPayload>>,
}

impl PostScriptTransport {
    fn new(script: Vec<Result<(), ()>>) -> Arc<Self> {
        Arc::new(Self {
            script: Mutex::new(script),
            posts: Mutex::new(Vec::new()),
        })
    }

    fn post_count(&self) -> usize {
        self.posts.lock().len()
    }
}

#[async_trait]
impl Transport for PostScriptTransport {
    async fn fetch_identity(
        &self,
        _candidate: &ServerCandidate,
        _timeout: Duration,
    ) -> Result<IdentityPayload, TransportError> {
        Ok(IdentityPayload::default())
    }

    async fn post_current_url(
        &self,
        _candidate: &ServerCandidate,
        payload: &CurrentUrlPayload,
        _timeout: Duration,
    ) -> Result<(), TransportError> {
        self.posts.lock().push(payload.clone());
        let mut script = self.script.lock();
        let result = if script.len() > 1 {
            script.remove(0)
        } else {
            script.first().copied().unwrap_or(Ok(()))
        };
        result.map_err(|_| TransportError::Status(500))
    }
}

fn sync_over(transport: Arc<PostScriptTransport>) -> ContextSync {
    ContextSync::new(transport, &ConnectorConfig::default())
}

fn payload() -> CurrentUrlPayload {
    ContextSync::payload(7, "https://example.com", "tab_url_change")
}

#[test]
fn test_payload_fields() {
    let payload = ContextSync::payload(7, "https://example.com", "tab_activated");
    assert_eq!(payload.tab_id, 7);
    assert_eq!(payload.url, "https://example.com");
    assert_eq!(payload.source, "tab_activated");
    assert!(payload.timestamp > 0);
}

#[tokio::test(start_paused = true)]
async fn test_first_attempt_success() {
    let transport = PostScriptTransport::new(vec![Ok(())]);
    let sync = sync_over(transport.clone());

    let delivered = sync
        .deliver(&ServerCandidate::loopback(3025), &payload())
        .await;
    assert!(delivered);
    assert_eq!(transport.post_count(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_retries_then_succeeds() {
    let transport = PostScriptTransport::new(vec![Err(()), Err(()), Ok(())]);
    let sync = sync_over(transport.clone());

    let delivered = sync
        .deliver(&ServerCandidate::loopback(3025), &payload())
        .await;
    assert!(delivered);
    assert_eq!(transport.post_count(), 3);
}

#[tokio::test(start_paused = true)]
async fn test_exhaustion_drops_update() {
    let transport = PostScriptTransport::new(vec![Err(())]);
    let sync = sync_over(transport.clone());

    let delivered = sync
        .deliver(&ServerCandidate::loopback(3025), &payload())
        .await;
    assert!(!delivered);
    // Bounded: exactly max_attempts, never more.
    assert_eq!(transport.post_count(), 3);
}
