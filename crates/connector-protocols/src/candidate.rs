//! Candidate endpoints and the identity handshake model.
//!
//! A candidate is a (host, port) pair eligible for probing as the companion
//! server. A candidate is trusted only after a handshake whose `signature`
//! exactly matches [`PROTOCOL_SIGNATURE`].

use std::fmt;

use serde::{Deserialize, Serialize};

#[cfg(test)]
#[path = "candidate_tests.rs"]
mod tests;

/// Signature the companion server must return to be trusted.
///
/// Prevents linking to an unrelated service listening on the same port.
pub const PROTOCOL_SIGNATURE: &str = "mcp-browser-connector-24x7";

/// Fallback display name when the server omits `name` from its identity.
pub const DEFAULT_SERVER_NAME: &str = "Browser Tools Server";

/// A (host, port) pair eligible for probing as the companion server.
///
/// Immutable value; equality is by (host, port).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ServerCandidate {
    /// Host name or address.
    pub host: String,
    /// TCP port.
    pub port: u16,
}

impl ServerCandidate {
    /// Create a new candidate.
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
        }
    }

    /// Candidate on the loopback host.
    pub fn loopback(port: u16) -> Self {
        Self::new("localhost", port)
    }

    /// Base URL for requests against this candidate.
    pub fn base_url(&self) -> String {
        format!("http://{}:{}", self.host, self.port)
    }
}

impl fmt::Display for ServerCandidate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.host, self.port)
    }
}

/// Identity carried by a verified handshake.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerIdentity {
    /// The signature literal the server answered with.
    pub signature: String,
    /// Human-readable server name.
    pub name: String,
    /// Server version string.
    pub version: String,
}

/// Wire body of `GET /.identity`.
///
/// Every field is optional on the wire; validation decides what to make of
/// missing ones.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdentityPayload {
    /// Signature claimed by the server.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub signature: Option<String>,
    /// Server name, if advertised.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Server version, if advertised.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
}

impl IdentityPayload {
    /// Whether the payload carries the exact protocol signature.
    ///
    /// Absence, empty strings, and case variants all fail this check.
    pub fn is_signed(&self) -> bool {
        self.signature.as_deref() == Some(PROTOCOL_SIGNATURE)
    }

    /// Convert into a [`ServerIdentity`], filling defaults for missing
    /// name/version.
    pub fn into_identity(self) -> ServerIdentity {
        ServerIdentity {
            signature: self.signature.unwrap_or_default(),
            name: self.name.unwrap_or_else(|| DEFAULT_SERVER_NAME.to_string()),
            version: self.version.unwrap_or_default(),
        }
    }
}

/// Wire body of `POST /current-url`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CurrentUrlPayload {
    /// The tab's current URL.
    pub url: String,
    /// Browser tab id the URL belongs to.
    pub tab_id: i64,
    /// Epoch milliseconds at send time.
    pub timestamp: i64,
    /// What triggered the sync (e.g. `tab_url_change`, `auto_discovery`).
    pub source: String,
}

/// Outcome of probing a single candidate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProbeOutcome {
    /// The candidate answered with the exact protocol signature.
    Verified(ServerIdentity),
    /// Something answered, but not with the protocol signature.
    Rejected,
    /// Nothing usable answered.
    Unreachable(UnreachableCause),
}

/// Why a candidate was unreachable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UnreachableCause {
    /// The probe exceeded its timeout.
    Timeout,
    /// Connection-level failure (refused, DNS, transport).
    Transport(String),
    /// The endpoint answered with a non-success status.
    Status(u16),
}

impl fmt::Display for UnreachableCause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UnreachableCause::Timeout => write!(f, "timed out"),
            UnreachableCause::Transport(reason) => write!(f, "transport failure: {}", reason),
            UnreachableCause::Status(code) => write!(f, "status {}", code),
        }
    }
}

/// Result of one probe, consumed by the scanner to decide continue/stop.
#[derive(Debug, Clone)]
pub struct ScanAttemptRecord {
    /// The candidate that was probed.
    pub candidate: ServerCandidate,
    /// How the probe was classified.
    pub outcome: ProbeOutcome,
    /// Wall-clock duration of the probe in milliseconds.
    pub elapsed_ms: u64,
}

/// Final result of an ordered candidate scan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScanResult {
    /// A candidate answered with the protocol signature.
    Found {
        /// The winning candidate.
        candidate: ServerCandidate,
        /// Its verified identity.
        identity: ServerIdentity,
    },
    /// The list was exhausted, or the scan was superseded, with no match.
    NotFound,
}
