//! # Connector Protocols
//!
//! Core protocol definitions for the browser connector. Contains the data
//! model, host capability traits, and event types - no implementations.
//!
//! ## Core Types
//!
//! - [`ServerCandidate`] / [`ServerIdentity`] - the handshake model
//! - [`ProbeOutcome`] / [`ScanResult`] - probe and scan classification
//! - [`ConnectionState`] / [`StatusEvent`] - session status and bus events
//! - [`Transport`] / [`SettingsStore`] - host capability traits

pub mod candidate;
pub mod error;
pub mod event;
pub mod settings;
pub mod transport;

// Re-export core types
pub use candidate::{
    CurrentUrlPayload, IdentityPayload, ProbeOutcome, ScanAttemptRecord, ScanResult,
    ServerCandidate, ServerIdentity, UnreachableCause, DEFAULT_SERVER_NAME, PROTOCOL_SIGNATURE,
};
pub use error::{SettingsError, TransportError};
pub use event::{BrowserEvent, ConnectionState, DiscoveryReason, StatusEvent};
pub use settings::{ConnectorSettings, SettingsStore};
pub use transport::Transport;
