//! Transport module for mproxy
//!
//! This module provides the outbound connection abstraction used by the
//! pool, the plain TCP dialer, and the TLS client used by the resolver.

mod tcp;
mod tls;

pub use tcp::TcpDialer;
pub use tls::{TlsConnectorBuilder, TlsStream};
pub(crate) use tls::tls_handshake;

use crate::config::PoolConfig;
use crate::error::DialError;
use async_trait::async_trait;
use std::fmt::Debug;
use std::net::SocketAddr;
use std::time::Duration;
use tokio::io::{AsyncRead, AsyncWrite};
use tokio::net::TcpStream;

/// Socket options for configuring connections
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SocketOpts {
    /// Enable TCP_NODELAY
    pub nodelay: bool,
    /// TCP keep-alive period, `None` leaves keep-alive off
    pub keepalive: Option<Duration>,
}

impl Default for SocketOpts {
    fn default() -> Self {
        SocketOpts::for_pooled()
    }
}

impl SocketOpts {
    /// Options for pooled relay connections: keep-alive on, Nagle left enabled
    pub fn for_pooled() -> Self {
        SocketOpts {
            nodelay: false,
            keepalive: Some(Duration::from_secs(crate::helper::DEFAULT_KEEPALIVE_SECS)),
        }
    }

    /// Create socket options from pool config
    pub fn from_pool_config(config: &PoolConfig) -> Self {
        SocketOpts {
            nodelay: config.nodelay,
            keepalive: Some(config.keepalive),
        }
    }

    /// Apply socket options to a TCP stream
    pub fn apply(&self, stream: &TcpStream) -> std::io::Result<()> {
        stream.set_nodelay(self.nodelay)?;

        if let Some(period) = self.keepalive {
            let socket = socket2::SockRef::from(stream);
            let keepalive = socket2::TcpKeepalive::new()
                .with_time(period)
                .with_interval(period);
            socket.set_tcp_keepalive(&keepalive)?;
        }

        Ok(())
    }
}

/// Factory for outbound connections
///
/// The pool only needs "give me a live stream to this address"; tests
/// substitute in-memory dialers through this trait.
#[async_trait]
pub trait Dialer: Debug + Send + Sync + 'static {
    /// The stream type produced by this dialer
    type Stream: AsyncRead + AsyncWrite + Unpin + Send + Debug + 'static;

    /// Open one connection to `addr`
    async fn dial(&self, addr: SocketAddr) -> Result<Self::Stream, DialError>;
}
