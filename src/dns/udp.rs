//! Plaintext DNS upstream
//!
//! Sends the lookup queries over UDP to the first server that answers.
//! Truncated replies are asked again over TCP to the same server.

use super::message::{build_query, collect_addresses, parse_name, parse_response, LOOKUP_TYPES};
use super::servers::first_reachable;
use super::tls::exchange_framed;
use super::Upstream;
use crate::config::ResolverConfig;
use crate::error::{ResolveError, UpstreamError};
use crate::helper::MAX_UDP_DNS_MESSAGE;
use async_trait::async_trait;
use std::io;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr, SocketAddr};
use std::time::Duration;
use tokio::net::{TcpStream, UdpSocket};
use tracing::debug;

/// Plaintext UDP DNS transport
#[derive(Debug, Clone)]
pub struct UdpUpstream {
    /// Servers tried in order
    servers: Vec<SocketAddr>,
    /// Per-query timeout
    timeout: Duration,
}

impl UdpUpstream {
    /// Create the upstream from resolver config
    pub fn new(config: &ResolverConfig) -> Self {
        UdpUpstream {
            servers: config.plain_servers.clone(),
            timeout: config.query_timeout,
        }
    }

    /// Send each query to one server and wait for the matching replies
    async fn exchange(
        &self,
        server: SocketAddr,
        queries: &[(u16, Vec<u8>)],
    ) -> io::Result<Vec<Vec<u8>>> {
        let local: SocketAddr = if server.is_ipv4() {
            (Ipv4Addr::UNSPECIFIED, 0).into()
        } else {
            (Ipv6Addr::UNSPECIFIED, 0).into()
        };
        let socket = UdpSocket::bind(local).await?;
        socket.connect(server).await?;

        let mut replies = Vec::with_capacity(queries.len());
        for (id, query) in queries {
            socket.send(query).await?;
            let reply = tokio::time::timeout(self.timeout, recv_matching(&socket, *id))
                .await
                .map_err(|_| io::Error::new(io::ErrorKind::TimedOut, "no reply"))??;
            replies.push(reply);
        }

        Ok(replies)
    }

    /// Repeat one query over TCP after a truncated UDP reply
    async fn exchange_tcp(
        &self,
        server: SocketAddr,
        query: &[u8],
    ) -> Result<Vec<u8>, ResolveError> {
        let attempt = async {
            let mut stream = TcpStream::connect(server).await?;
            exchange_framed(&mut stream, query).await
        };

        let reply = tokio::time::timeout(self.timeout, attempt)
            .await
            .map_err(|_| ResolveError::Timeout(server))??;
        Ok(reply)
    }
}

/// Receive datagrams until one carries the expected message id
async fn recv_matching(socket: &UdpSocket, id: u16) -> io::Result<Vec<u8>> {
    let mut buf = vec![0u8; MAX_UDP_DNS_MESSAGE];
    loop {
        let n = socket.recv(&mut buf).await?;
        if n >= 2 && u16::from_be_bytes([buf[0], buf[1]]) == id {
            buf.truncate(n);
            return Ok(buf);
        }
        debug!("Discarding stray DNS datagram ({} bytes)", n);
    }
}

#[async_trait]
impl Upstream for UdpUpstream {
    fn name(&self) -> &str {
        "plaintext dns"
    }

    async fn lookup(&self, host: &str) -> Result<Vec<IpAddr>, UpstreamError> {
        let name = parse_name(host)?;
        let queries = LOOKUP_TYPES
            .iter()
            .map(|rtype| build_query(&name, *rtype))
            .collect::<Result<Vec<_>, ResolveError>>()?;

        let (server, replies) = first_reachable(&self.servers, |addr| self.exchange(addr, &queries))
            .await
            .map_err(UpstreamError::Unreachable)?;

        debug!("Resolved {} via plaintext DNS server {}", host, server);

        let mut answers = Vec::new();
        for ((id, query), reply) in queries.iter().zip(replies.iter()) {
            let addrs = match parse_response(*id, reply) {
                Err(ResolveError::Truncated) => {
                    debug!("Truncated reply from {}, retrying over TCP", server);
                    let reply = self.exchange_tcp(server, query).await?;
                    parse_response(*id, &reply)?
                }
                result => result?,
            };
            answers.extend(addrs);
        }
        Ok(collect_addresses(host, answers)?)
    }
}
