//! Error types for mproxy
//!
//! Errors never travel between components as data: the pool retries dial
//! failures locally, sessions tear themselves down, and everything that cannot
//! be recovered is funneled into [`FatalError`] for the entry point to act on.

use hickory_proto::op::ResponseCode;
use std::io;
use std::net::SocketAddr;
use thiserror::Error;

/// Failure to turn a hostname into addresses
#[derive(Error, Debug)]
pub enum ResolveError {
    /// Hostname is not a valid DNS name
    #[error("Invalid hostname {0:?}: {1}")]
    InvalidName(String, String),

    /// Query could not be encoded or response could not be decoded
    #[error("DNS message error: {0}")]
    Encode(String),

    /// IO error while talking to a name server
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// Name server did not answer in time
    #[error("DNS query to {0} timed out")]
    Timeout(SocketAddr),

    /// TLS setup failed
    #[error("TLS error: {0}")]
    Tls(String),

    /// Name server answered with an error code
    #[error("Name server returned {0}")]
    ServerFailure(ResponseCode),

    /// Reply was cut short and must be asked again over TCP
    #[error("Truncated DNS response")]
    Truncated,

    /// Name resolved but carried no usable address
    #[error("No addresses found for {0}")]
    NoAddresses(String),

    /// No transport in the chain could reach a name server
    #[error("No name server available")]
    Unavailable,
}

/// Outcome of a single upstream transport that did not produce addresses
#[derive(Error, Debug)]
pub enum UpstreamError {
    /// Every server of this transport failed to connect
    #[error("All servers unreachable: {}", .0.join(", "))]
    Unreachable(Vec<String>),

    /// A server was reached but resolution failed
    #[error(transparent)]
    Failed(#[from] ResolveError),
}

/// Failure to open one outbound connection
#[derive(Error, Debug)]
pub enum DialError {
    /// Connect did not finish within the dial timeout
    #[error("Connection timeout to {0}")]
    Timeout(SocketAddr),

    /// Remote actively refused the connection
    #[error("Connection refused by {0}")]
    Refused(SocketAddr),

    /// No route to the remote
    #[error("Network unreachable for {0}: {1}")]
    Unreachable(SocketAddr, io::Error),

    /// Any other socket error
    #[error("Failed to connect to {0}: {1}")]
    Io(SocketAddr, io::Error),
}

impl DialError {
    /// Classify an IO error raised while connecting to `addr`
    pub fn from_io(addr: SocketAddr, err: io::Error) -> Self {
        match err.kind() {
            io::ErrorKind::ConnectionRefused => DialError::Refused(addr),
            io::ErrorKind::TimedOut => DialError::Timeout(addr),
            io::ErrorKind::NetworkUnreachable | io::ErrorKind::HostUnreachable => {
                DialError::Unreachable(addr, err)
            }
            _ => DialError::Io(addr, err),
        }
    }

    /// Address the dial was aimed at
    pub fn addr(&self) -> SocketAddr {
        match self {
            DialError::Timeout(addr)
            | DialError::Refused(addr)
            | DialError::Unreachable(addr, _)
            | DialError::Io(addr, _) => *addr,
        }
    }
}

/// Unrecoverable errors that terminate the process
#[derive(Error, Debug)]
pub enum FatalError {
    /// Invalid startup configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// Initial resolution of the remote host failed
    #[error("Resolution failed: {0}")]
    Resolution(#[from] ResolveError),

    /// Listen socket could not be bound
    #[error("Failed to bind {addr}: {source}")]
    Bind {
        /// Address we tried to bind
        addr: SocketAddr,
        /// Underlying socket error
        source: io::Error,
    },

    /// Accept on the listen socket failed
    #[error("Accept failed: {0}")]
    Accept(io::Error),

    /// TLS client setup for the resolver failed
    #[error("TLS setup failed: {0}")]
    Tls(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    fn addr() -> SocketAddr {
        "192.0.2.1:80".parse().unwrap()
    }

    #[test]
    fn test_dial_error_from_io() {
        let err = DialError::from_io(addr(), io::Error::from(io::ErrorKind::ConnectionRefused));
        assert!(matches!(err, DialError::Refused(_)));

        let err = DialError::from_io(addr(), io::Error::from(io::ErrorKind::TimedOut));
        assert!(matches!(err, DialError::Timeout(_)));

        let err = DialError::from_io(addr(), io::Error::from(io::ErrorKind::NetworkUnreachable));
        assert!(matches!(err, DialError::Unreachable(_, _)));

        let err = DialError::from_io(addr(), io::Error::from(io::ErrorKind::PermissionDenied));
        assert!(matches!(err, DialError::Io(_, _)));
        assert_eq!(err.addr(), addr());
    }

    #[test]
    fn test_dial_error_display() {
        assert_eq!(
            DialError::Timeout(addr()).to_string(),
            "Connection timeout to 192.0.2.1:80"
        );
        assert_eq!(
            DialError::Refused(addr()).to_string(),
            "Connection refused by 192.0.2.1:80"
        );
    }

    #[test]
    fn test_upstream_error_display() {
        let err = UpstreamError::Unreachable(vec!["a".to_string(), "b".to_string()]);
        assert_eq!(err.to_string(), "All servers unreachable: a, b");

        let err: UpstreamError = ResolveError::NoAddresses("example.com".to_string()).into();
        assert_eq!(err.to_string(), "No addresses found for example.com");
    }

    #[test]
    fn test_fatal_error_from_resolve() {
        let err: FatalError = ResolveError::Unavailable.into();
        assert!(matches!(err, FatalError::Resolution(ResolveError::Unavailable)));
        assert_eq!(err.to_string(), "Resolution failed: No name server available");
    }

    #[test]
    fn test_fatal_error_display() {
        let err = FatalError::Config("host and port is required".to_string());
        assert_eq!(err.to_string(), "Configuration error: host and port is required");

        let err = FatalError::Bind {
            addr: addr(),
            source: io::Error::from(io::ErrorKind::AddrInUse),
        };
        assert!(err.to_string().starts_with("Failed to bind 192.0.2.1:80"));
    }
}
