//! Proxy session
//!
//! Pairs one inbound client with one pooled connection and relays bytes in
//! both directions until either side finishes.

use crate::pool::PoolService;
use crate::transport::Dialer;
use anyhow::{Context, Result};
use std::io;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::io::{AsyncRead, AsyncWrite};
use tracing::{debug, info};

/// Serve one inbound client with a connection from `pool`
///
/// Waits as long as it takes for a pooled connection. Both streams are
/// owned here and closed on every exit path.
pub async fn handle_session<S, D>(
    inbound: S,
    client: SocketAddr,
    pool: Arc<PoolService<D>>,
) -> Result<()>
where
    S: AsyncRead + AsyncWrite + Unpin,
    D: Dialer,
{
    let pooled = pool
        .acquire()
        .await
        .context("Connection pool is closed")?;

    info!("{} -> {}", client, pooled.peer());

    match relay(inbound, pooled.into_stream()).await {
        Ok(bytes) => debug!("Session for {} closed after {} bytes", client, bytes),
        Err(e) => debug!("Session for {} closed: {}", client, e),
    }
    Ok(())
}

/// Relay data bidirectionally between two streams
///
/// Copies in both directions concurrently and returns as soon as either
/// direction reaches EOF or errors, yielding the byte count of the direction
/// that finished first. Both streams are dropped on return.
pub async fn relay<A, B>(a: A, b: B) -> io::Result<u64>
where
    A: AsyncRead + AsyncWrite + Unpin,
    B: AsyncRead + AsyncWrite + Unpin,
{
    let (mut a_read, mut a_write) = tokio::io::split(a);
    let (mut b_read, mut b_write) = tokio::io::split(b);

    let a_to_b = tokio::io::copy(&mut a_read, &mut b_write);
    let b_to_a = tokio::io::copy(&mut b_read, &mut a_write);

    tokio::select! {
        result = a_to_b => {
            match &result {
                Ok(bytes) => debug!("client->remote finished: {} bytes", bytes),
                Err(e) => debug!("client->remote error: {}", e),
            }
            result
        }
        result = b_to_a => {
            match &result {
                Ok(bytes) => debug!("remote->client finished: {} bytes", bytes),
                Err(e) => debug!("remote->client error: {}", e),
            }
            result
        }
    }
}
