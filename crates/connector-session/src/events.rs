//! Status event fan-out.

use tokio::sync::broadcast;
use tracing::trace;

use connector_protocols::StatusEvent;

/// Broadcast bus for status events.
///
/// Publishing never blocks; events published with no subscribers are dropped.
#[derive(Clone)]
pub struct EventBus {
    tx: broadcast::Sender<StatusEvent>,
}

impl EventBus {
    /// Create a bus with the given buffered capacity per subscriber.
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self { tx }
    }

    /// Subscribe to status events.
    pub fn subscribe(&self) -> broadcast::Receiver<StatusEvent> {
        self.tx.subscribe()
    }

    /// Publish an event to all subscribers.
    pub fn publish(&self, event: StatusEvent) {
        trace!(?event, "publishing status event");
        let _ = self.tx.send(event);
    }
}
