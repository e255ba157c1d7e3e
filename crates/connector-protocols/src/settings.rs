//! Persisted connector settings and the storage capability trait.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::candidate::ServerCandidate;
use crate::error::SettingsError;

/// Persisted settings record.
///
/// Read once at startup; written whenever discovery succeeds against a new
/// candidate so future sessions prefer the last-known-good server first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectorSettings {
    /// Host of the preferred candidate.
    #[serde(default = "default_server_host")]
    pub server_host: String,

    /// Port of the preferred candidate.
    #[serde(default = "default_server_port")]
    pub server_port: u16,

    /// Loopback ports probed after the configured candidate, in order.
    #[serde(default = "default_auto_discovery_ports")]
    pub auto_discovery_ports: Vec<u16>,
}

fn default_server_host() -> String {
    "localhost".to_string()
}

fn default_server_port() -> u16 {
    3025
}

fn default_auto_discovery_ports() -> Vec<u16> {
    vec![3025, 3000, 8000, 8080, 4000, 5000]
}

impl Default for ConnectorSettings {
    fn default() -> Self {
        Self {
            server_host: default_server_host(),
            server_port: default_server_port(),
            auto_discovery_ports: default_auto_discovery_ports(),
        }
    }
}

impl ConnectorSettings {
    /// The configured candidate, probed first during discovery.
    pub fn configured_candidate(&self) -> ServerCandidate {
        ServerCandidate::new(self.server_host.clone(), self.server_port)
    }

    /// Record a newly discovered candidate as the preferred server.
    pub fn set_candidate(&mut self, candidate: &ServerCandidate) {
        self.server_host = candidate.host.clone();
        self.server_port = candidate.port;
    }
}

/// Storage capability for the settings record.
///
/// Host environments supply the backing store (browser extension storage,
/// a config file, memory for tests).
#[async_trait]
pub trait SettingsStore: Send + Sync {
    /// Load the persisted record; `None` when nothing was stored yet.
    async fn load(&self) -> Result<Option<ConnectorSettings>, SettingsError>;

    /// Persist the record.
    async fn save(&self, settings: &ConnectorSettings) -> Result<(), SettingsError>;
}
