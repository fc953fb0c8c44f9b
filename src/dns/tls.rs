//! DNS-over-TLS upstream
//!
//! Opens one TLS session to the first reachable server and sends the
//! lookup queries through it using the TCP length-prefixed framing.

use super::message::{build_query, collect_addresses, parse_name, parse_response, LOOKUP_TYPES};
use super::servers::first_reachable;
use super::Upstream;
use crate::config::ResolverConfig;
use crate::error::{FatalError, ResolveError, UpstreamError};
use crate::transport::{tls_handshake, SocketOpts, TlsConnectorBuilder, TlsStream};
use async_trait::async_trait;
use hickory_proto::rr::Name;
use std::io;
use std::net::{IpAddr, SocketAddr};
use std::time::Duration;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tokio::net::TcpStream;
use tokio_rustls::TlsConnector;
use tracing::debug;

/// DNS-over-TLS transport
pub struct TlsUpstream {
    /// Servers tried in order
    servers: Vec<SocketAddr>,
    /// Name verified in the server certificate
    server_name: String,
    /// TLS connector
    connector: TlsConnector,
    /// Connect and per-query timeout
    timeout: Duration,
}

impl std::fmt::Debug for TlsUpstream {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TlsUpstream")
            .field("servers", &self.servers)
            .field("server_name", &self.server_name)
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl TlsUpstream {
    /// Create the upstream from resolver config, trusting the platform roots
    pub fn new(config: &ResolverConfig) -> Result<Self, FatalError> {
        let connector = TlsConnectorBuilder::new().build()?;
        Ok(Self::with_connector(config, connector))
    }

    /// Create the upstream with a caller-supplied connector
    pub fn with_connector(config: &ResolverConfig, connector: TlsConnector) -> Self {
        TlsUpstream {
            servers: config.tls_servers.clone(),
            server_name: config.tls_server_name.clone(),
            connector,
            timeout: config.query_timeout,
        }
    }

    /// TCP connect plus TLS handshake to one server
    async fn connect(&self, addr: SocketAddr) -> io::Result<TlsStream> {
        let attempt = async {
            let tcp_stream = TcpStream::connect(addr).await?;
            SocketOpts::for_pooled().apply(&tcp_stream)?;
            tls_handshake(&self.connector, tcp_stream, &self.server_name).await
        };

        tokio::time::timeout(self.timeout, attempt)
            .await
            .map_err(|_| io::Error::new(io::ErrorKind::TimedOut, "connect timed out"))?
    }

    /// Send every lookup query over an established session
    async fn query_all(
        &self,
        stream: &mut TlsStream,
        server: SocketAddr,
        name: &Name,
    ) -> Result<Vec<IpAddr>, ResolveError> {
        let mut answers = Vec::new();

        for rtype in LOOKUP_TYPES {
            let (id, query) = build_query(name, rtype)?;
            let response = tokio::time::timeout(self.timeout, exchange_framed(stream, &query))
                .await
                .map_err(|_| ResolveError::Timeout(server))??;
            answers.extend(parse_response(id, &response)?);
        }

        Ok(answers)
    }
}

#[async_trait]
impl Upstream for TlsUpstream {
    fn name(&self) -> &str {
        "dns over tls"
    }

    async fn lookup(&self, host: &str) -> Result<Vec<IpAddr>, UpstreamError> {
        let name = parse_name(host)?;

        let (server, mut stream) = first_reachable(&self.servers, |addr| self.connect(addr))
            .await
            .map_err(UpstreamError::Unreachable)?;

        debug!("Resolving {} via DNS-over-TLS server {}", host, server);

        let answers = self.query_all(&mut stream, server, &name).await?;
        Ok(collect_addresses(host, answers)?)
    }
}

/// Write one length-prefixed DNS message and read the length-prefixed reply
pub(crate) async fn exchange_framed<S>(stream: &mut S, query: &[u8]) -> io::Result<Vec<u8>>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    let len = u16::try_from(query.len())
        .map_err(|_| io::Error::new(io::ErrorKind::InvalidInput, "DNS query too large"))?;

    let mut frame = Vec::with_capacity(query.len() + 2);
    frame.extend_from_slice(&len.to_be_bytes());
    frame.extend_from_slice(query);
    stream.write_all(&frame).await?;
    stream.flush().await?;

    let reply_len = stream.read_u16().await? as usize;
    let mut reply = vec![0u8; reply_len];
    stream.read_exact(&mut reply).await?;

    Ok(reply)
}
