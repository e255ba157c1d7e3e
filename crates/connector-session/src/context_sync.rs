//! Bounded-retry delivery of the active URL.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tracing::{debug, warn};

use connector_protocols::{CurrentUrlPayload, ServerCandidate, Transport};

use crate::config::ConnectorConfig;

#[cfg(test)]
#[path = "context_sync_tests.rs"]
mod tests;

/// Delivers current-URL updates with bounded retry.
///
/// Exhausted updates are dropped, never queued; the next browser event
/// re-triggers a sync with fresher data.
#[derive(Clone)]
pub struct ContextSync {
    transport: Arc<dyn Transport>,
    timeout: Duration,
    max_attempts: u32,
    retry_delay: Duration,
}

impl ContextSync {
    /// Create a delivery component from the session configuration.
    pub fn new(transport: Arc<dyn Transport>, config: &ConnectorConfig) -> Self {
        Self {
            transport,
            timeout: config.sync_timeout(),
            max_attempts: config.sync_max_attempts,
            retry_delay: config.sync_retry_delay(),
        }
    }

    /// Build the wire payload for a sync, stamped with the current time.
    pub fn payload(
        tab_id: i64,
        url: impl Into<String>,
        source: impl Into<String>,
    ) -> CurrentUrlPayload {
        CurrentUrlPayload {
            url: url.into(),
            tab_id,
            timestamp: Utc::now().timestamp_millis(),
            source: source.into(),
        }
    }

    /// Attempt delivery to `candidate`.
    ///
    /// Returns `true` when any attempt succeeded.
    pub async fn deliver(&self, candidate: &ServerCandidate, payload: &CurrentUrlPayload) -> bool {
        for attempt in 1..=self.max_attempts {
            match self
                .transport
                .post_current_url(candidate, payload, self.timeout)
                .await
            {
                Ok(()) => {
                    debug!(%candidate, tab_id = payload.tab_id, attempt, "url update delivered");
                    return true;
                }
                Err(err) => {
                    debug!(
                        %candidate,
                        tab_id = payload.tab_id,
                        attempt,
                        %err,
                        "url update attempt failed"
                    );
                    if attempt < self.max_attempts {
                        tokio::time::sleep(self.retry_delay).await;
                    }
                }
            }
        }

        warn!(
            %candidate,
            tab_id = payload.tab_id,
            url = %payload.url,
            attempts = self.max_attempts,
            "dropping url update after exhausting retries"
        );
        false
    }
}
