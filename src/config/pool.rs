//! Connection pool configuration
//!
//! Defines configuration for the pre-warmed outbound connection pool.

use crate::helper::{
    duration_from_secs, DEFAULT_DIAL_TIMEOUT_SECS, DEFAULT_KEEPALIVE_SECS,
    DEFAULT_POOL_CAPACITY, DEFAULT_RETRY_DELAY_SECS,
};
use std::time::Duration;

/// Connection pool configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PoolConfig {
    /// Maximum number of ready connections held in the queue
    pub capacity: usize,

    /// Timeout for a single outbound dial
    pub dial_timeout: Duration,

    /// Fixed delay after a failed dial
    pub retry_delay: Duration,

    /// TCP keep-alive period applied to pooled connections
    pub keepalive: Duration,

    /// Enable TCP_NODELAY on pooled connections
    pub nodelay: bool,
}

impl Default for PoolConfig {
    fn default() -> Self {
        PoolConfig {
            capacity: DEFAULT_POOL_CAPACITY,
            dial_timeout: duration_from_secs(DEFAULT_DIAL_TIMEOUT_SECS),
            retry_delay: duration_from_secs(DEFAULT_RETRY_DELAY_SECS),
            keepalive: duration_from_secs(DEFAULT_KEEPALIVE_SECS),
            nodelay: false,
        }
    }
}

impl PoolConfig {
    /// Validate the pool configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.capacity == 0 {
            return Err("pool capacity must be greater than 0".to_string());
        }
        if self.dial_timeout.is_zero() {
            return Err("dial timeout must be greater than 0".to_string());
        }
        Ok(())
    }
}
