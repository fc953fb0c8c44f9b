//! Proxy module for mproxy
//!
//! Wires the resolver, pool and listener together. Every error that escapes
//! this module is a [`FatalError`].

mod listener;
mod session;

pub use listener::Listener;
pub use session::{handle_session, relay};

use crate::config::Config;
use crate::dns::{Resolve, ResolverChain};
use crate::error::FatalError;
use crate::pool::create_pool;
use crate::transport::{Dialer, TcpDialer};
use tracing::info;

/// Run the forwarder with the production resolver and dialer
pub async fn run_proxy(config: Config) -> Result<(), FatalError> {
    config.validate()?;
    let resolver = ResolverChain::from_config(&config.resolver)?;
    let dialer = TcpDialer::new(&config.pool);
    serve(config, &resolver, dialer).await
}

/// Resolve, start the pool, then accept forever
///
/// The target is resolved before the listener is bound, so an unresolvable
/// host never opens a port.
pub async fn serve<R, D>(config: Config, resolver: &R, dialer: D) -> Result<(), FatalError>
where
    R: Resolve + ?Sized,
    D: Dialer,
{
    let target = &config.target;
    info!(
        "listen at port {}, proxy to {}:{}",
        target.effective_listen_port(),
        target.host,
        target.port
    );

    let pool = create_pool(config.pool.clone(), resolver, dialer, &target.host, target.port).await?;
    pool.spawn();

    let listener = Listener::bind(target.listen_addr()).await?;
    listener.run(pool).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TargetConfig;

    #[tokio::test]
    async fn test_run_proxy_rejects_invalid_config() {
        let config = Config::new(TargetConfig::new("", 80));
        assert!(matches!(run_proxy(config).await, Err(FatalError::Config(_))));
    }
}
