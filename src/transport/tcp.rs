//! TCP dialer implementation
//!
//! Opens plain TCP connections for the pool.

use super::{Dialer, SocketOpts};
use crate::config::PoolConfig;
use crate::error::DialError;
use async_trait::async_trait;
use std::net::SocketAddr;
use std::time::Duration;
use tokio::net::TcpStream;

/// TCP dialer for pooled connections
#[derive(Debug, Clone)]
pub struct TcpDialer {
    /// Socket options to apply to connections
    socket_opts: SocketOpts,
    /// Connection timeout
    connect_timeout: Duration,
}

impl TcpDialer {
    /// Create a new TCP dialer with default options
    pub fn with_defaults() -> Self {
        TcpDialer {
            socket_opts: SocketOpts::for_pooled(),
            connect_timeout: Duration::from_secs(crate::helper::DEFAULT_DIAL_TIMEOUT_SECS),
        }
    }

    /// Create a dialer from pool config
    pub fn new(config: &PoolConfig) -> Self {
        TcpDialer {
            socket_opts: SocketOpts::from_pool_config(config),
            connect_timeout: config.dial_timeout,
        }
    }
}

#[async_trait]
impl Dialer for TcpDialer {
    type Stream = TcpStream;

    async fn dial(&self, addr: SocketAddr) -> Result<TcpStream, DialError> {
        let stream = tokio::time::timeout(self.connect_timeout, TcpStream::connect(addr))
            .await
            .map_err(|_| DialError::Timeout(addr))?
            .map_err(|e| DialError::from_io(addr, e))?;

        self.socket_opts
            .apply(&stream)
            .map_err(|e| DialError::Io(addr, e))?;

        tracing::debug!("TCP connection established to {}", addr);

        Ok(stream)
    }
}
