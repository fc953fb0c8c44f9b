//! Connection pool module for mproxy
//!
//! This module keeps a small buffer of pre-dialed outbound connections so
//! that a client session never waits on a fresh handshake to the remote.

mod addrs;
mod connection;
mod service;
mod stats;

pub use addrs::AddressSet;
pub use connection::PooledConnection;
pub use service::PoolService;
pub use stats::{PoolStats, PoolStatsSnapshot};

use crate::config::PoolConfig;
use crate::dns::Resolve;
use crate::error::{FatalError, ResolveError};
use crate::transport::Dialer;
use std::sync::Arc;

/// Resolve `host` once and build a pool around the result
///
/// Resolution failure is fatal: there is no retry and no re-resolution.
pub async fn create_pool<R, D>(
    config: PoolConfig,
    resolver: &R,
    dialer: D,
    host: &str,
    port: u16,
) -> Result<Arc<PoolService<D>>, FatalError>
where
    R: Resolve + ?Sized,
    D: Dialer,
{
    let addrs = resolver.resolve(host).await?;
    let addrs = AddressSet::new(addrs).ok_or_else(|| ResolveError::NoAddresses(host.to_string()))?;
    Ok(PoolService::new(config, dialer, addrs, port))
}
