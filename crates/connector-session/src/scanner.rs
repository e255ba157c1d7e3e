//! Ordered candidate scan.

use std::time::{Duration, Instant};

use tracing::{debug, info};

use connector_protocols::{
    ConnectorSettings, ProbeOutcome, ScanAttemptRecord, ScanResult, ServerCandidate,
};

use crate::token::ScanToken;
use crate::validator::IdentityValidator;

#[cfg(test)]
#[path = "scanner_tests.rs"]
mod tests;

/// Probes an ordered candidate list until one verifies or the list runs out.
///
/// Probing is strictly sequential so total resource usage stays bounded and
/// failure diagnostics remain attributable to one candidate.
#[derive(Clone)]
pub struct CandidateScanner {
    validator: IdentityValidator,
    probe_timeout: Duration,
}

impl CandidateScanner {
    /// Create a scanner with the given per-probe timeout.
    pub fn new(validator: IdentityValidator, probe_timeout: Duration) -> Self {
        Self {
            validator,
            probe_timeout,
        }
    }

    /// Candidate order for a scan: the configured candidate first, then the
    /// auto-discovery ports on the loopback host, skipping duplicates of the
    /// configured entry.
    pub fn candidate_order(settings: &ConnectorSettings) -> Vec<ServerCandidate> {
        let configured = settings.configured_candidate();
        let mut order = vec![configured.clone()];
        for port in &settings.auto_discovery_ports {
            let fallback = ServerCandidate::loopback(*port);
            if fallback != configured {
                order.push(fallback);
            }
        }
        order
    }

    /// Probe candidates in order until one verifies.
    ///
    /// A stale token stops the scan immediately with no side effects; the
    /// caller that superseded it owns the next decision.
    pub async fn scan(&self, candidates: &[ServerCandidate], token: &ScanToken) -> ScanResult {
        for candidate in candidates {
            if !token.is_current() {
                debug!(generation = token.id(), "scan superseded, stopping");
                return ScanResult::NotFound;
            }

            let started = Instant::now();
            let outcome = self.validator.validate(candidate, self.probe_timeout).await;
            let attempt = ScanAttemptRecord {
                candidate: candidate.clone(),
                outcome,
                elapsed_ms: started.elapsed().as_millis() as u64,
            };
            debug!(
                candidate = %attempt.candidate,
                elapsed_ms = attempt.elapsed_ms,
                outcome = ?attempt.outcome,
                "probe finished"
            );

            if let ProbeOutcome::Verified(identity) = attempt.outcome {
                info!(%candidate, "discovered companion server");
                return ScanResult::Found {
                    candidate: candidate.clone(),
                    identity,
                };
            }
        }

        debug!(count = candidates.len(), "candidate list exhausted");
        ScanResult::NotFound
    }
}
