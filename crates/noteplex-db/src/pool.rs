//! PostgreSQL connection pool setup.

use std::time::Duration;

use sqlx::postgres::{PgPool, PgPoolOptions};
use tracing::{debug, info, warn};

use noteplex_core::{Error, Result};

/// Connection pool tuning knobs.
///
/// The defaults suit a single-instance deployment: ten connections,
/// a thirty-second acquire timeout, idle connections recycled after
/// ten minutes, and every connection replaced after half an hour.
/// Deployments that need different sizing set `DB_MAX_CONNECTIONS` /
/// `DB_MIN_CONNECTIONS` and build the config with [`PoolConfig::from_env`].
#[derive(Debug, Clone)]
pub struct PoolConfig {
    pub max_connections: u32,
    pub min_connections: u32,
    pub acquire_timeout: Duration,
    pub idle_timeout: Duration,
    pub max_lifetime: Duration,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            max_connections: 10,
            min_connections: 1,
            acquire_timeout: Duration::from_secs(30),
            idle_timeout: Duration::from_secs(10 * 60),
            max_lifetime: Duration::from_secs(30 * 60),
        }
    }
}

fn env_u32(name: &str, fallback: u32) -> u32 {
    std::env::var(name)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(fallback)
}

impl PoolConfig {
    /// Build a config from the environment, keeping the defaults for
    /// anything unset or unparsable.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            max_connections: env_u32("DB_MAX_CONNECTIONS", defaults.max_connections),
            min_connections: env_u32("DB_MIN_CONNECTIONS", defaults.min_connections),
            ..defaults
        }
    }

    /// Cap the pool at `n` connections.
    pub fn max_connections(mut self, n: u32) -> Self {
        self.max_connections = n;
        self
    }

    /// Keep at least `n` connections open.
    pub fn min_connections(mut self, n: u32) -> Self {
        self.min_connections = n;
        self
    }
}

/// Open a pool against `database_url` with the default configuration.
pub async fn create_pool(database_url: &str) -> Result<PgPool> {
    create_pool_with_config(database_url, PoolConfig::default()).await
}

/// Open a pool against `database_url` with an explicit configuration.
pub async fn create_pool_with_config(database_url: &str, config: PoolConfig) -> Result<PgPool> {
    let pool = PgPoolOptions::new()
        .max_connections(config.max_connections)
        .min_connections(config.min_connections)
        .acquire_timeout(config.acquire_timeout)
        .idle_timeout(config.idle_timeout)
        .max_lifetime(config.max_lifetime)
        .connect(database_url)
        .await
        .map_err(Error::Database)?;

    info!(
        subsystem = "db",
        component = "pool",
        op = "connect",
        max_connections = config.max_connections,
        min_connections = config.min_connections,
        pool_size = pool.size(),
        pool_idle = pool.num_idle(),
        "Database connection pool ready"
    );
    Ok(pool)
}

/// Log the pool's current size and idle count.
///
/// Warns when every connection is checked out, since a starved pool
/// stalls request handling before anything else does.
pub fn log_pool_status(pool: &PgPool) {
    let size = pool.size();
    let idle = pool.num_idle();
    debug!(
        subsystem = "db",
        component = "pool",
        op = "status",
        pool_size = size,
        pool_idle = idle,
        "Pool status"
    );
    if size > 0 && idle == 0 {
        warn!(
            subsystem = "db",
            component = "pool",
            pool_size = size,
            "All pool connections are in use"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_sane() {
        let config = PoolConfig::default();
        assert!(config.min_connections <= config.max_connections);
        assert!(config.idle_timeout < config.max_lifetime);
    }

    #[test]
    fn test_builder_overrides() {
        let config = PoolConfig::default().max_connections(4).min_connections(2);
        assert_eq!(config.max_connections, 4);
        assert_eq!(config.min_connections, 2);
    }

    #[test]
    fn test_env_u32_ignores_garbage() {
        assert_eq!(env_u32("NOTEPLEX_TEST_UNSET_POOL_VAR", 7), 7);
    }
}
