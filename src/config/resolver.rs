//! Resolver configuration
//!
//! Fixed name server lists for the encrypted and plaintext transports.

use crate::helper::{duration_from_secs, DEFAULT_DNS_TIMEOUT_SECS};
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::time::Duration;

/// Default DNS-over-TLS servers (Cloudflare)
fn default_tls_servers() -> Vec<SocketAddr> {
    vec![
        SocketAddr::new(IpAddr::V4(Ipv4Addr::new(1, 1, 1, 1)), 853),
        SocketAddr::new(IpAddr::V4(Ipv4Addr::new(1, 0, 0, 1)), 853),
    ]
}

/// Default plaintext DNS servers (Google)
fn default_plain_servers() -> Vec<SocketAddr> {
    vec![
        SocketAddr::new(IpAddr::V4(Ipv4Addr::new(8, 8, 8, 8)), 53),
        SocketAddr::new(IpAddr::V4(Ipv4Addr::new(8, 8, 4, 4)), 53),
    ]
}

/// Name server configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolverConfig {
    /// DNS-over-TLS servers, tried in order
    pub tls_servers: Vec<SocketAddr>,

    /// Name presented and verified during the TLS handshake
    pub tls_server_name: String,

    /// Plaintext DNS servers, tried in order after TLS is unavailable
    pub plain_servers: Vec<SocketAddr>,

    /// Per-server connect and query timeout
    pub query_timeout: Duration,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        ResolverConfig {
            tls_servers: default_tls_servers(),
            tls_server_name: "cloudflare-dns.com".to_string(),
            plain_servers: default_plain_servers(),
            query_timeout: duration_from_secs(DEFAULT_DNS_TIMEOUT_SECS),
        }
    }
}

impl ResolverConfig {
    /// Validate the resolver configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.tls_servers.is_empty() && self.plain_servers.is_empty() {
            return Err("at least one name server is required".to_string());
        }
        if !self.tls_servers.is_empty() && self.tls_server_name.is_empty() {
            return Err("tls_server_name is required for DNS-over-TLS".to_string());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolver_config_default() {
        let config = ResolverConfig::default();
        assert_eq!(
            config.tls_servers,
            vec![
                "1.1.1.1:853".parse::<SocketAddr>().unwrap(),
                "1.0.0.1:853".parse().unwrap()
            ]
        );
        assert_eq!(
            config.plain_servers,
            vec![
                "8.8.8.8:53".parse::<SocketAddr>().unwrap(),
                "8.8.4.4:53".parse().unwrap()
            ]
        );
        assert_eq!(config.tls_server_name, "cloudflare-dns.com");
        assert_eq!(config.query_timeout, Duration::from_secs(5));
    }

    #[test]
    fn test_resolver_config_validate() {
        assert!(ResolverConfig::default().validate().is_ok());

        let config = ResolverConfig {
            tls_servers: vec![],
            plain_servers: vec![],
            ..Default::default()
        };
        assert!(config.validate().is_err());

        let config = ResolverConfig {
            tls_server_name: String::new(),
            ..Default::default()
        };
        assert!(config.validate().is_err());

        let config = ResolverConfig {
            tls_servers: vec![],
            tls_server_name: String::new(),
            ..Default::default()
        };
        assert!(config.validate().is_ok());
    }
}
