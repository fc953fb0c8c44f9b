//! Helper utilities for mproxy
//!
//! Shared defaults and small conversions used across modules.

use std::time::Duration;

/// Number of ready outbound connections kept in the pool
pub const DEFAULT_POOL_CAPACITY: usize = 5;

/// Outbound dial timeout in seconds
pub const DEFAULT_DIAL_TIMEOUT_SECS: u64 = 5;

/// Delay between failed dial attempts in seconds
pub const DEFAULT_RETRY_DELAY_SECS: u64 = 1;

/// TCP keep-alive period for pooled connections in seconds
pub const DEFAULT_KEEPALIVE_SECS: u64 = 180;

/// Per-server DNS query timeout in seconds
pub const DEFAULT_DNS_TIMEOUT_SECS: u64 = 5;

/// Largest DNS message we accept over UDP
pub const MAX_UDP_DNS_MESSAGE: usize = 4096;

/// Parse duration from seconds
pub fn duration_from_secs(secs: u64) -> Duration {
    Duration::from_secs(secs)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constants() {
        assert_eq!(DEFAULT_POOL_CAPACITY, 5);
        assert_eq!(DEFAULT_DIAL_TIMEOUT_SECS, 5);
        assert_eq!(DEFAULT_RETRY_DELAY_SECS, 1);
        assert_eq!(DEFAULT_KEEPALIVE_SECS, 3 * 60);
    }

    #[test]
    fn test_duration_from_secs() {
        assert_eq!(duration_from_secs(5), Duration::from_secs(5));
        assert_eq!(duration_from_secs(0), Duration::from_secs(0));
        assert_eq!(duration_from_secs(180), Duration::from_secs(180));
    }
}
