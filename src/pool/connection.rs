//! Pooled connection structure
//!
//! A live outbound stream plus the metadata logged on handoff.

use std::net::SocketAddr;
use std::time::{Duration, Instant};

/// A pre-dialed outbound connection waiting for a session
#[derive(Debug)]
pub struct PooledConnection<S> {
    /// The underlying stream
    stream: S,
    /// Remote endpoint the stream is connected to
    peer: SocketAddr,
    /// When the connection was dialed
    created_at: Instant,
}

impl<S> PooledConnection<S> {
    /// Wrap a freshly dialed stream
    pub fn new(stream: S, peer: SocketAddr) -> Self {
        PooledConnection {
            stream,
            peer,
            created_at: Instant::now(),
        }
    }

    /// Remote endpoint
    pub fn peer(&self) -> SocketAddr {
        self.peer
    }

    /// Time since the connection was dialed
    pub fn age(&self) -> Duration {
        self.created_at.elapsed()
    }

    /// Take the underlying stream
    pub fn into_stream(self) -> S {
        self.stream
    }
}
