//! Target configuration
//!
//! The remote endpoint to forward to and the local port to accept on.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};

/// Remote endpoint and local listener settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetConfig {
    /// Remote hostname or IP literal
    pub host: String,

    /// Remote port
    pub port: u16,

    /// Local listen port, 0 means "same as `port`"
    pub listen_port: u16,

    /// Local address the listener binds to
    pub bind_addr: IpAddr,
}

impl TargetConfig {
    /// Create a target listening on the same port it forwards to
    pub fn new(host: &str, port: u16) -> Self {
        TargetConfig {
            host: host.to_string(),
            port,
            listen_port: 0,
            bind_addr: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
        }
    }

    /// Set the local listen port
    pub fn with_listen_port(mut self, port: u16) -> Self {
        self.listen_port = port;
        self
    }

    /// Set the local bind address
    pub fn with_bind_addr(mut self, addr: IpAddr) -> Self {
        self.bind_addr = addr;
        self
    }

    /// Port the listener actually binds
    pub fn effective_listen_port(&self) -> u16 {
        if self.listen_port == 0 {
            self.port
        } else {
            self.listen_port
        }
    }

    /// Socket address the listener binds
    pub fn listen_addr(&self) -> SocketAddr {
        SocketAddr::new(self.bind_addr, self.effective_listen_port())
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.host.trim().is_empty() || self.port == 0 {
            return Err("host and port is required".to_string());
        }
        Ok(())
    }
}
