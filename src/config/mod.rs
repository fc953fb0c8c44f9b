//! Configuration module for mproxy
//!
//! This module provides the typed configuration assembled from the command
//! line. There is no config file: everything not set by a flag has a fixed
//! default.

mod pool;
mod resolver;
mod target;

pub use pool::PoolConfig;
pub use resolver::ResolverConfig;
pub use target::TargetConfig;

use crate::error::FatalError;

/// Root configuration structure
#[derive(Debug, Clone)]
pub struct Config {
    /// Remote endpoint and local listener
    pub target: TargetConfig,

    /// Connection pool tuning
    pub pool: PoolConfig,

    /// Name servers used to resolve the target
    pub resolver: ResolverConfig,
}

impl Config {
    /// Build a configuration for `target` with default pool and resolver settings
    pub fn new(target: TargetConfig) -> Self {
        Config {
            target,
            pool: PoolConfig::default(),
            resolver: ResolverConfig::default(),
        }
    }

    /// Validate every section, refusing to start on the first problem
    pub fn validate(&self) -> Result<(), FatalError> {
        self.target.validate().map_err(FatalError::Config)?;
        self.pool.validate().map_err(FatalError::Config)?;
        self.resolver.validate().map_err(FatalError::Config)?;
        Ok(())
    }
}
