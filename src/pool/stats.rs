//! Pool statistics
//!
//! Counters updated by the replenish loop and by sessions taking
//! connections, logged at debug level.

use std::sync::atomic::{AtomicUsize, Ordering};
use tracing::debug;

/// Statistics for the connection pool
#[derive(Debug, Default)]
pub struct PoolStats {
    /// Successful dials
    pub total_dialed: AtomicUsize,
    /// Failed dials
    pub total_dial_failures: AtomicUsize,
    /// Connections handed to sessions
    pub total_handed_out: AtomicUsize,
}

impl PoolStats {
    /// Create new pool stats
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a successful dial
    pub fn record_dialed(&self) {
        self.total_dialed.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a failed dial
    pub fn record_dial_failure(&self) {
        self.total_dial_failures.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a connection handed to a session
    pub fn record_handed_out(&self) {
        self.total_handed_out.fetch_add(1, Ordering::Relaxed);
    }

    /// Get current stats snapshot
    pub fn snapshot(&self) -> PoolStatsSnapshot {
        PoolStatsSnapshot {
            total_dialed: self.total_dialed.load(Ordering::Relaxed),
            total_dial_failures: self.total_dial_failures.load(Ordering::Relaxed),
            total_handed_out: self.total_handed_out.load(Ordering::Relaxed),
        }
    }

    /// Log pool health status
    pub fn log_health(&self, ready: usize) {
        let stats = self.snapshot();
        debug!(
            "Pool health: ready={}, dialed={}, dial_failures={}, handed_out={}",
            ready, stats.total_dialed, stats.total_dial_failures, stats.total_handed_out
        );
    }
}

/// Snapshot of pool statistics
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PoolStatsSnapshot {
    /// Successful dials
    pub total_dialed: usize,
    /// Failed dials
    pub total_dial_failures: usize,
    /// Connections handed to sessions
    pub total_handed_out: usize,
}
