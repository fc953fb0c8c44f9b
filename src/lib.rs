//! # mproxy - Pre-warmed TCP Forwarder
//!
//! mproxy listens on a local port and splices every inbound client onto an
//! outbound connection that was dialed before the client arrived. A single
//! background task keeps a small queue of such connections filled.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use mproxy::config::{Config, TargetConfig};
//! use mproxy::proxy::run_proxy;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::new(TargetConfig::new("example.com", 443).with_listen_port(8443));
//!     run_proxy(config).await?;
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ResolverChain -> addresses -> PoolService -> queue -> session <- Listener
//! ```
//!
//! The target is resolved once at startup (DNS-over-TLS, falling back to
//! plaintext DNS). The pool then dials random resolved addresses forever,
//! blocking while its queue is full. Each accepted client takes the oldest
//! queued connection and the two are relayed until either side closes.

#![warn(missing_docs)]
#![warn(rust_2018_idioms)]

pub mod config;
pub mod dns;
pub mod error;
pub mod helper;
pub mod pool;
pub mod proxy;
pub mod transport;

// Re-export commonly used items
pub use config::{Config, TargetConfig};
pub use error::{DialError, FatalError, ResolveError};
pub use proxy::run_proxy;

/// Version of the mproxy library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Name of the application
pub const NAME: &str = env!("CARGO_PKG_NAME");
