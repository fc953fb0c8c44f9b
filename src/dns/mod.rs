//! Resolver chain for mproxy
//!
//! Turns the target hostname into addresses by walking an ordered list of
//! DNS transports: DNS-over-TLS first, plaintext UDP second. A transport
//! whose servers cannot be reached is skipped with a warning; a transport
//! that reaches a server settles the outcome, success or failure.

pub mod message;
mod servers;
mod tls;
mod udp;

pub use servers::first_reachable;
pub use tls::TlsUpstream;
pub use udp::UdpUpstream;

use crate::config::ResolverConfig;
use crate::error::{FatalError, ResolveError, UpstreamError};
use async_trait::async_trait;
use std::net::IpAddr;
use tracing::{debug, info, warn};

/// One DNS transport with its own fixed server list
#[async_trait]
pub trait Upstream: Send + Sync {
    /// Human readable transport name used in logs
    fn name(&self) -> &str;

    /// Look up A and AAAA records for `host`
    async fn lookup(&self, host: &str) -> Result<Vec<IpAddr>, UpstreamError>;
}

/// Hostname to address resolution
#[async_trait]
pub trait Resolve: Send + Sync {
    /// Resolve `host` into a non-empty list of addresses
    async fn resolve(&self, host: &str) -> Result<Vec<IpAddr>, ResolveError>;
}

/// Ordered fallback over DNS transports
pub struct ResolverChain {
    upstreams: Vec<Box<dyn Upstream>>,
}

impl std::fmt::Debug for ResolverChain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let names: Vec<&str> = self.upstreams.iter().map(|u| u.name()).collect();
        f.debug_struct("ResolverChain")
            .field("upstreams", &names)
            .finish()
    }
}

impl ResolverChain {
    /// Build a chain from explicit upstreams, tried in order
    pub fn new(upstreams: Vec<Box<dyn Upstream>>) -> Self {
        ResolverChain { upstreams }
    }

    /// Build the DNS-over-TLS then plaintext chain described by `config`
    pub fn from_config(config: &ResolverConfig) -> Result<Self, FatalError> {
        let mut upstreams: Vec<Box<dyn Upstream>> = Vec::new();
        if !config.tls_servers.is_empty() {
            upstreams.push(Box::new(TlsUpstream::new(config)?));
        }
        if !config.plain_servers.is_empty() {
            upstreams.push(Box::new(UdpUpstream::new(config)));
        }
        Ok(ResolverChain::new(upstreams))
    }

    /// Number of transports in the chain
    pub fn len(&self) -> usize {
        self.upstreams.len()
    }

    /// Whether the chain has no transports
    pub fn is_empty(&self) -> bool {
        self.upstreams.is_empty()
    }
}

/// Parse an IP literal, accepting bracketed IPv6
fn ip_literal(host: &str) -> Option<IpAddr> {
    host.trim_start_matches('[')
        .trim_end_matches(']')
        .parse()
        .ok()
}

#[async_trait]
impl Resolve for ResolverChain {
    async fn resolve(&self, host: &str) -> Result<Vec<IpAddr>, ResolveError> {
        if let Some(ip) = ip_literal(host) {
            debug!("{} is an IP literal, skipping DNS", host);
            return Ok(vec![ip]);
        }

        for upstream in &self.upstreams {
            match upstream.lookup(host).await {
                Ok(addrs) => {
                    info!("Resolved {} via {}: {:?}", host, upstream.name(), addrs);
                    return Ok(addrs);
                }
                Err(UpstreamError::Unreachable(errors)) => {
                    warn!("{} not available", upstream.name());
                    debug!("{} errors: {}", upstream.name(), errors.join("; "));
                }
                Err(UpstreamError::Failed(e)) => return Err(e),
            }
        }

        Err(ResolveError::Unavailable)
    }
}
