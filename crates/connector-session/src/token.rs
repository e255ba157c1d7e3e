//! Generation-token cancellation.
//!
//! Invalidating a token is O(1) and never interrupts an in-flight request;
//! it only guarantees the request's eventual result is discarded.
//! Comparison-on-completion is the sole cancellation mechanism.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

#[cfg(test)]
#[path = "token_tests.rs"]
mod tests;

/// Issues scan tokens from a monotonic generation counter.
#[derive(Debug, Clone, Default)]
pub struct TokenIssuer {
    generation: Arc<AtomicU64>,
}

impl TokenIssuer {
    /// Create an issuer starting at generation zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Invalidate every outstanding token and issue the replacement.
    pub fn issue(&self) -> ScanToken {
        let id = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        ScanToken {
            generation: self.generation.clone(),
            id,
        }
    }

    /// Invalidate every outstanding token without issuing a new one.
    pub fn invalidate(&self) {
        self.generation.fetch_add(1, Ordering::SeqCst);
    }

    /// Generation of the most recently issued token.
    pub fn current(&self) -> u64 {
        self.generation.load(Ordering::SeqCst)
    }
}

/// Identifies one scan attempt; stale once superseded.
#[derive(Debug, Clone)]
pub struct ScanToken {
    generation: Arc<AtomicU64>,
    id: u64,
}

impl ScanToken {
    /// Whether this token still identifies the current scan.
    pub fn is_current(&self) -> bool {
        self.generation.load(Ordering::SeqCst) == self.id
    }

    /// Generation id carried by this token.
    pub fn id(&self) -> u64 {
        self.id
    }
}
