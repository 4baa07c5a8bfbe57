use std::str::FromStr;
use std::time::Duration;

use deadpool_postgres::{BuildError, Manager, ManagerConfig, Pool, RecyclingMethod, Runtime};
use thiserror::Error;
use tokio_postgres::NoTls;

pub type PgPool = Pool;

/// Sizing for the `job_openings` reader pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PoolSettings {
    pub max_size: usize,
    /// Bound on waiting for a free connection and on opening a new one.
    pub checkout_timeout: Duration,
}

impl Default for PoolSettings {
    fn default() -> Self {
        Self {
            max_size: 8,
            checkout_timeout: Duration::from_secs(5),
        }
    }
}

#[derive(Debug, Error)]
pub enum DbPoolError {
    #[error("invalid database url: {0}")]
    InvalidUrl(#[from] tokio_postgres::Error),
    #[error("pool size must be at least 1")]
    EmptyPool,
    #[error("failed to build database pool: {0}")]
    Build(#[from] BuildError),
}

/// Build a pool without opening a connection; the first checkout connects.
pub fn create_pool_from_url(db_url: &str, settings: PoolSettings) -> Result<PgPool, DbPoolError> {
    if settings.max_size == 0 {
        return Err(DbPoolError::EmptyPool);
    }

    let pg_config = tokio_postgres::Config::from_str(db_url)?;
    let manager = Manager::from_config(
        pg_config,
        NoTls,
        ManagerConfig {
            recycling_method: RecyclingMethod::Fast,
        },
    );

    let pool = Pool::builder(manager)
        .max_size(settings.max_size)
        .runtime(Runtime::Tokio1)
        .wait_timeout(Some(settings.checkout_timeout))
        .create_timeout(Some(settings.checkout_timeout))
        .build()?;
    Ok(pool)
}
