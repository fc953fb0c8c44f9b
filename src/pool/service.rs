//! Pool service implementation
//!
//! One long-running replenish loop dials random addresses from the resolved
//! set and pushes live connections into a bounded queue; sessions take them
//! out exactly once.

use super::addrs::AddressSet;
use super::connection::PooledConnection;
use super::stats::PoolStats;
use crate::config::PoolConfig;
use crate::transport::Dialer;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::sync::{mpsc, Mutex};
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

/// Pre-warmed outbound connection pool
pub struct PoolService<D: Dialer> {
    /// Pool configuration
    config: PoolConfig,
    /// Dialer for creating connections
    dialer: D,
    /// Resolved addresses of the target
    addrs: AddressSet,
    /// Target port
    port: u16,
    /// Producer side of the ready queue
    ready_tx: mpsc::Sender<PooledConnection<D::Stream>>,
    /// Consumer side of the ready queue, the fair lock keeps waiters FIFO
    ready_rx: Mutex<mpsc::Receiver<PooledConnection<D::Stream>>>,
    /// Pool statistics
    stats: PoolStats,
}

impl<D: Dialer> std::fmt::Debug for PoolService<D> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PoolService")
            .field("config", &self.config)
            .field("dialer", &self.dialer)
            .field("addrs", &self.addrs)
            .field("port", &self.port)
            .field("ready", &self.ready())
            .finish()
    }
}

impl<D: Dialer> PoolService<D> {
    /// Create a pool for `addrs:port`; nothing is dialed until [`run`](Self::run)
    pub fn new(config: PoolConfig, dialer: D, addrs: AddressSet, port: u16) -> Arc<Self> {
        let (ready_tx, ready_rx) = mpsc::channel(config.capacity.max(1));

        Arc::new(PoolService {
            config,
            dialer,
            addrs,
            port,
            ready_tx,
            ready_rx: Mutex::new(ready_rx),
            stats: PoolStats::new(),
        })
    }

    /// Start the replenish loop on the runtime
    pub fn spawn(self: &Arc<Self>) -> JoinHandle<()> {
        let pool = self.clone();
        tokio::spawn(async move { pool.run().await })
    }

    /// Replenish loop, runs for the lifetime of the process
    ///
    /// Dial failures are logged and retried after a flat delay; a successful
    /// dial blocks here while the queue is full.
    pub async fn run(self: Arc<Self>) {
        info!(
            "Connection pool started: {} addresses, capacity {}",
            self.addrs.len(),
            self.capacity()
        );

        loop {
            let addr = SocketAddr::new(self.addrs.pick(), self.port);

            let stream = match self.dialer.dial(addr).await {
                Ok(stream) => stream,
                Err(e) => {
                    self.stats.record_dial_failure();
                    warn!("{}", e);
                    tokio::time::sleep(self.config.retry_delay).await;
                    continue;
                }
            };

            self.stats.record_dialed();
            if self
                .ready_tx
                .send(PooledConnection::new(stream, addr))
                .await
                .is_err()
            {
                error!("Connection queue closed, stopping pool");
                return;
            }

            debug!("Pooled connection to {} ready", addr);
            self.stats.log_health(self.ready());
        }
    }

    /// Take the oldest ready connection, waiting until one exists
    ///
    /// Returns `None` only if the queue has been closed.
    pub async fn acquire(&self) -> Option<PooledConnection<D::Stream>> {
        let conn = {
            let mut ready_rx = self.ready_rx.lock().await;
            ready_rx.recv().await?
        };

        self.stats.record_handed_out();
        debug!(
            "Handing out connection to {} (pooled for {:?})",
            conn.peer(),
            conn.age()
        );
        self.stats.log_health(self.ready());

        Some(conn)
    }

    /// Number of connections waiting in the queue
    pub fn ready(&self) -> usize {
        self.ready_tx.max_capacity() - self.ready_tx.capacity()
    }

    /// Maximum number of queued connections
    pub fn capacity(&self) -> usize {
        self.ready_tx.max_capacity()
    }

    /// Resolved addresses the pool dials into
    pub fn addresses(&self) -> &AddressSet {
        &self.addrs
    }

    /// Get pool statistics
    pub fn stats(&self) -> &PoolStats {
        &self.stats
    }
}
