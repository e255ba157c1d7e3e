//! Session-level errors.

use thiserror::Error;

use connector_protocols::{SettingsError, TransportError};

/// Errors surfaced by the session crate's public API.
///
/// Network-probe failures never appear here; they are classified into
/// [`connector_protocols::ProbeOutcome`] and consumed internally.
#[derive(Debug, Error)]
pub enum SessionError {
    /// Settings persistence failed.
    #[error("settings error: {0}")]
    Settings(#[from] SettingsError),

    /// Transport construction failed.
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),
}
