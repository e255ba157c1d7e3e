//! Session manager configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;

/// Runtime tuning for the session manager.
///
/// Defaults mirror the production extension: fast 1 s probes while scanning,
/// a longer bound for explicit checks, and a 10 s reconnect delay.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConnectorConfig {
    /// Per-candidate probe timeout while scanning (in milliseconds).
    #[serde(default = "default_probe_timeout_ms")]
    pub probe_timeout_ms: u64,

    /// Timeout for explicit user-initiated identity checks (in milliseconds).
    #[serde(default = "default_check_timeout_ms")]
    pub check_timeout_ms: u64,

    /// Timeout for one current-URL delivery attempt (in milliseconds).
    #[serde(default = "default_sync_timeout_ms")]
    pub sync_timeout_ms: u64,

    /// Maximum delivery attempts per logical URL update.
    #[serde(default = "default_sync_max_attempts")]
    pub sync_max_attempts: u32,

    /// Fixed delay between delivery attempts (in milliseconds).
    #[serde(default = "default_sync_retry_delay_ms")]
    pub sync_retry_delay_ms: u64,

    /// Delay before an automatic re-scan after disconnection (in milliseconds).
    #[serde(default = "default_reconnect_delay_ms")]
    pub reconnect_delay_ms: u64,

    /// Status event bus capacity.
    #[serde(default = "default_event_capacity")]
    pub event_capacity: usize,
}

fn default_probe_timeout_ms() -> u64 {
    1000
}

fn default_check_timeout_ms() -> u64 {
    2000
}

fn default_sync_timeout_ms() -> u64 {
    5000
}

fn default_sync_max_attempts() -> u32 {
    3
}

fn default_sync_retry_delay_ms() -> u64 {
    500
}

fn default_reconnect_delay_ms() -> u64 {
    10_000
}

fn default_event_capacity() -> usize {
    64
}

impl Default for ConnectorConfig {
    fn default() -> Self {
        Self {
            probe_timeout_ms: default_probe_timeout_ms(),
            check_timeout_ms: default_check_timeout_ms(),
            sync_timeout_ms: default_sync_timeout_ms(),
            sync_max_attempts: default_sync_max_attempts(),
            sync_retry_delay_ms: default_sync_retry_delay_ms(),
            reconnect_delay_ms: default_reconnect_delay_ms(),
            event_capacity: default_event_capacity(),
        }
    }
}

impl ConnectorConfig {
    /// Probe timeout as a [`Duration`].
    pub fn probe_timeout(&self) -> Duration {
        Duration::from_millis(self.probe_timeout_ms)
    }

    /// Explicit check timeout as a [`Duration`].
    pub fn check_timeout(&self) -> Duration {
        Duration::from_millis(self.check_timeout_ms)
    }

    /// Delivery attempt timeout as a [`Duration`].
    pub fn sync_timeout(&self) -> Duration {
        Duration::from_millis(self.sync_timeout_ms)
    }

    /// Inter-attempt delivery delay as a [`Duration`].
    pub fn sync_retry_delay(&self) -> Duration {
        Duration::from_millis(self.sync_retry_delay_ms)
    }

    /// Reconnect delay as a [`Duration`].
    pub fn reconnect_delay(&self) -> Duration {
        Duration::from_millis(self.reconnect_delay_ms)
    }
}
