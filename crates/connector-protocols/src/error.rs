//! Error taxonomy for the connector core.
//!
//! Network failures are expected and non-fatal: they are fully consumed by
//! the component that issued the call, and only session-level state changes
//! propagate upward as events.

use thiserror::Error;

/// Transport-level failure of a single request.
#[derive(Debug, Error)]
pub enum TransportError {
    /// The request exceeded its bounded timeout.
    #[error("request timed out")]
    Timeout,

    /// Connection-level failure (refused, DNS, transport).
    #[error("connection failed: {0}")]
    Connect(String),

    /// The endpoint answered with a non-success status.
    #[error("unexpected status {0}")]
    Status(u16),

    /// The endpoint answered 2xx with a body that does not parse.
    #[error("invalid response body: {0}")]
    InvalidBody(String),
}

/// Settings persistence failure.
#[derive(Debug, Error)]
pub enum SettingsError {
    /// Underlying IO failure.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The stored record does not parse.
    #[error("failed to parse settings: {0}")]
    Parse(String),

    /// The record could not be serialized.
    #[error("failed to serialize settings: {0}")]
    Serialize(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transport_error_display() {
        assert_eq!(TransportError::Timeout.to_string(), "request timed out");
        assert_eq!(TransportError::Status(500).to_string(), "unexpected status 500");
        assert!(TransportError::Connect("refused".to_string())
            .to_string()
            .contains("refused"));
    }

    #[test]
    fn test_settings_error_from_io() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err: SettingsError = io.into();
        assert!(err.to_string().contains("denied"));
    }
}
