//! Listener / acceptor
//!
//! Accepts inbound clients and starts one proxy session per connection.

use super::session::handle_session;
use crate::error::FatalError;
use crate::pool::PoolService;
use crate::transport::Dialer;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{debug, info, warn};

/// Bound listen socket
#[derive(Debug)]
pub struct Listener {
    inner: TcpListener,
}

impl Listener {
    /// Bind the listen socket
    pub async fn bind(addr: SocketAddr) -> Result<Self, FatalError> {
        let inner = TcpListener::bind(addr)
            .await
            .map_err(|source| FatalError::Bind { addr, source })?;
        Ok(Listener { inner })
    }

    /// Address the socket is actually bound to
    pub fn local_addr(&self) -> Result<SocketAddr, FatalError> {
        self.inner.local_addr().map_err(FatalError::Accept)
    }

    /// Accept clients forever, one concurrent session each
    ///
    /// Only returns on an accept failure, which is fatal.
    pub async fn run<D: Dialer>(self, pool: Arc<PoolService<D>>) -> Result<(), FatalError> {
        info!("Accepting connections on {}", self.local_addr()?);

        loop {
            let (stream, client) = self.inner.accept().await.map_err(FatalError::Accept)?;
            debug!("Accepted connection from {}", client);

            let pool = pool.clone();
            tokio::spawn(async move {
                if let Err(e) = handle_session(stream, client, pool).await {
                    warn!("Session for {} failed: {:#}", client, e);
                }
            });
        }
    }
}
