//! Bounds and cancellation for the proof-of-work search

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use thiserror::Error;

/// Reasons a nonce search can stop without a valid hash
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MiningError {
    #[error("Mining cancelled after {attempts} attempts")]
    Cancelled { attempts: u64 },
    #[error("No valid nonce found within {0} attempts")]
    AttemptsExhausted(u64),
    #[error("Nonce space exhausted")]
    NonceSpaceExhausted,
}

/// Limits applied to a single nonce search
///
/// Clones share the cancellation flag, so a host can keep one copy and
/// cancel the search running on another thread.
#[derive(Debug, Clone, Default)]
pub struct MiningControl {
    cancelled: Arc<AtomicBool>,
    max_attempts: Option<u64>,
}

impl MiningControl {
    /// No attempt bound; only cancellation stops the search
    pub fn unbounded() -> Self {
        Self::default()
    }

    /// Stop after `max_attempts` hashes
    pub fn with_max_attempts(max_attempts: u64) -> Self {
        Self {
            cancelled: Arc::new(AtomicBool::new(false)),
            max_attempts: Some(max_attempts),
        }
    }

    /// Apply an optional bound, as read from configuration
    pub fn bounded_by(max_attempts: Option<u64>) -> Self {
        match max_attempts {
            Some(max) => Self::with_max_attempts(max),
            None => Self::unbounded(),
        }
    }

    pub fn max_attempts(&self) -> Option<u64> {
        self.max_attempts
    }

    /// Ask any search using this control to stop
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Relaxed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clones_share_cancellation() {
        let control = MiningControl::unbounded();
        let handle = control.clone();
        assert!(!control.is_cancelled());

        handle.cancel();
        assert!(control.is_cancelled());
    }

    #[test]
    fn test_bounded_by() {
        assert_eq!(MiningControl::bounded_by(None).max_attempts(), None);
        assert_eq!(MiningControl::bounded_by(Some(5)).max_attempts(), Some(5));
    }
}
