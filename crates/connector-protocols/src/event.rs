//! Session state and the events published to other extension surfaces.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::candidate::{ServerCandidate, ServerIdentity};

#[cfg(test)]
#[path = "event_tests.rs"]
mod tests;

/// Authoritative connection status of the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConnectionState {
    /// Initial state; discovery has never run.
    Idle,
    /// A scan is in flight.
    Discovering,
    /// Linked to a verified candidate.
    Connected,
    /// The last scan or liveness check failed.
    Disconnected,
}

impl fmt::Display for ConnectionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConnectionState::Idle => write!(f, "idle"),
            ConnectionState::Discovering => write!(f, "discovering"),
            ConnectionState::Connected => write!(f, "connected"),
            ConnectionState::Disconnected => write!(f, "disconnected"),
        }
    }
}

/// Why a discovery scan was requested.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DiscoveryReason {
    /// Explicit user action (reconnect button, CLI command).
    Explicit,
    /// A page refresh or completed navigation.
    Refresh,
    /// A liveness check against the active candidate failed.
    LivenessFailure,
    /// The reconnect timer fired.
    Scheduled,
}

/// Status event published on the session event bus.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum StatusEvent {
    /// The session state changed.
    ConnectionStatusChanged {
        /// New session state.
        state: ConnectionState,
        /// Active candidate when connected.
        #[serde(skip_serializing_if = "Option::is_none")]
        candidate: Option<ServerCandidate>,
        /// Verified identity when connected.
        #[serde(skip_serializing_if = "Option::is_none")]
        identity: Option<ServerIdentity>,
    },
    /// A discovery scan was requested.
    DiscoveryRequested {
        /// What triggered the request.
        reason: DiscoveryReason,
        /// Whether a running scan is cancelled and restarted.
        force_restart: bool,
    },
}

/// Host-agnostic browser events consumed by the session manager.
///
/// Each host environment (browser extension bridge, CLI, tests) translates
/// its native event stream into these.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BrowserEvent {
    /// A tracked tab navigated to a new URL.
    UrlChanged {
        /// Browser tab id.
        tab_id: i64,
        /// The new URL.
        url: String,
    },
    /// A tab finished loading (page refresh or navigation complete).
    PageLoadComplete {
        /// Browser tab id.
        tab_id: i64,
        /// URL at load completion.
        url: String,
    },
    /// A tab became the active tab.
    TabActivated {
        /// Browser tab id.
        tab_id: i64,
        /// The tab's URL when the host knows it.
        url: Option<String>,
    },
    /// A tab closed.
    TabClosed {
        /// Browser tab id.
        tab_id: i64,
    },
}
