//! Ordered name server selection
//!
//! Every transport walks a fixed list of servers and keeps the first one
//! that works.

use std::future::Future;
use std::io;
use std::net::SocketAddr;
use tracing::debug;

/// Try `connect` against each server in order, returning the first success
///
/// On total failure the per-server errors are returned in the order tried.
pub async fn first_reachable<T, F, Fut>(
    servers: &[SocketAddr],
    mut connect: F,
) -> Result<(SocketAddr, T), Vec<String>>
where
    F: FnMut(SocketAddr) -> Fut,
    Fut: Future<Output = io::Result<T>>,
{
    let mut errors = Vec::with_capacity(servers.len());

    for &server in servers {
        match connect(server).await {
            Ok(conn) => return Ok((server, conn)),
            Err(e) => {
                debug!("Name server {} unreachable: {}", server, e);
                errors.push(format!("{}: {}", server, e));
            }
        }
    }

    Err(errors)
}
