//! Network capability trait.
//!
//! Each host environment supplies a thin adapter implementing [`Transport`];
//! the session crate never talks to the network directly. This keeps the
//! discovery core testable with scripted fakes and host-agnostic across
//! browser variants.

use std::time::Duration;

use async_trait::async_trait;

use crate::candidate::{CurrentUrlPayload, IdentityPayload, ServerCandidate};
use crate::error::TransportError;

/// Network capability: identity probing and context delivery.
///
/// Implementations perform exactly one request per call and never retry;
/// retry policy belongs to the caller.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Fetch the candidate's identity document, bounded by `timeout`.
    async fn fetch_identity(
        &self,
        candidate: &ServerCandidate,
        timeout: Duration,
    ) -> Result<IdentityPayload, TransportError>;

    /// Deliver a current-URL payload to the candidate, bounded by `timeout`.
    async fn post_current_url(
        &self,
        candidate: &ServerCandidate,
        payload: &CurrentUrlPayload,
        timeout: Duration,
    ) -> Result<(), TransportError>;
}
