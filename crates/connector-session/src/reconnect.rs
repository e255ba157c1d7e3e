//! Delayed re-scan scheduling.

use std::future::Future;
use std::time::Duration;

use parking_lot::Mutex;
use tokio::task::JoinHandle;
use tracing::debug;

#[cfg(test)]
#[path = "reconnect_tests.rs"]
mod tests;

/// Arms a single delayed re-scan after disconnection.
///
/// Arming while a timer is pending is a no-op; timers never stack. Disarming
/// cancels the pending timer without running its callback.
pub struct ReconnectScheduler {
    delay: Duration,
    pending: Mutex<Option<JoinHandle<()>>>,
}

impl ReconnectScheduler {
    /// Create a scheduler with the given delay.
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: Mutex::new(None),
        }
    }

    /// Arm the timer; `on_fire` runs once after the delay unless disarmed.
    pub fn arm<F, Fut>(&self, on_fire: F)
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let mut pending = self.pending.lock();
        if let Some(handle) = pending.as_ref() {
            if !handle.is_finished() {
                debug!("reconnect timer already armed");
                return;
            }
        }
        let delay = self.delay;
        *pending = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            on_fire().await;
        }));
        debug!(delay_ms = delay.as_millis() as u64, "reconnect timer armed");
    }

    /// Cancel the pending timer, if any.
    pub fn disarm(&self) {
        if let Some(handle) = self.pending.lock().take() {
            handle.abort();
            debug!("reconnect timer disarmed");
        }
    }

    /// Whether a timer is pending.
    pub fn is_armed(&self) -> bool {
        self.pending
            .lock()
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
    }
}

impl Drop for ReconnectScheduler {
    fn drop(&mut self) {
        if let Some(handle) = self.pending.get_mut().take() {
            handle.abort();
        }
    }
}
