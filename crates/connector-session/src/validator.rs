//! Identity handshake against a single candidate.

use std::sync::Arc;
use std::time::Duration;

use tracing::debug;

use connector_protocols::{
    ProbeOutcome, ServerCandidate, Transport, TransportError, UnreachableCause,
};

#[cfg(test)]
#[path = "validator_tests.rs"]
mod tests;

/// Performs one handshake request and classifies the outcome.
///
/// No retries happen here; callers retry at their own granularity.
#[derive(Clone)]
pub struct IdentityValidator {
    transport: Arc<dyn Transport>,
}

impl IdentityValidator {
    /// Create a validator over the given transport.
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self { transport }
    }

    /// Probe `candidate` and classify the result.
    pub async fn validate(&self, candidate: &ServerCandidate, timeout: Duration) -> ProbeOutcome {
        match self.transport.fetch_identity(candidate, timeout).await {
            Ok(payload) if payload.is_signed() => {
                let identity = payload.into_identity();
                debug!(%candidate, name = %identity.name, "candidate verified");
                ProbeOutcome::Verified(identity)
            }
            Ok(payload) => {
                debug!(%candidate, signature = ?payload.signature, "server answered with wrong identity");
                ProbeOutcome::Rejected
            }
            // A live endpoint answered with junk: treat as a foreign server,
            // not as unreachable.
            Err(TransportError::InvalidBody(reason)) => {
                debug!(%candidate, %reason, "server answered with unparseable identity");
                ProbeOutcome::Rejected
            }
            Err(TransportError::Status(code)) => {
                debug!(%candidate, code, "candidate answered non-success status");
                ProbeOutcome::Unreachable(UnreachableCause::Status(code))
            }
            Err(TransportError::Timeout) => {
                debug!(%candidate, "candidate probe timed out");
                ProbeOutcome::Unreachable(UnreachableCause::Timeout)
            }
            Err(TransportError::Connect(reason)) => {
                debug!(%candidate, %reason, "candidate unreachable");
                ProbeOutcome::Unreachable(UnreachableCause::Transport(reason))
            }
        }
    }
}
