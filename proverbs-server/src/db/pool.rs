//! Database connection pool management
//!
//! Uses sqlx PgPool with explicit connection limits. The pool is created
//! lazily: no connection is opened until the first query after the
//! readiness check.

use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;

use crate::config::DatabaseConfig;

/// Create a PostgreSQL connection pool from configuration.
///
/// Pool sizing follows `pool_size + max_overflow`; every connection is
/// checked before being handed out and recycled after `max_lifetime`.
///
/// # Errors
///
/// Returns an error only if the connection options are malformed; the
/// database itself is not contacted.
///
/// # Example
///
/// ```ignore
/// let pool = create_pool(&config.database)?;
/// // first connection is opened on first use
/// ```
pub fn create_pool(config: &DatabaseConfig) -> Result<PgPool, sqlx::Error> {
    let options = config.connect_options()?;

    Ok(PgPoolOptions::new()
        .max_connections(config.max_connections())
        .acquire_timeout(config.acquire_timeout)
        .max_lifetime(config.max_lifetime)
        .test_before_acquire(true)
        .connect_lazy_with(options))
}
