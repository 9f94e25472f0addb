//! proverbs-server: authenticated proverb listing over HTTP
//!
//! Startup order matters:
//! 1. Load [`AppConfig`] from the environment
//! 2. Wait for the database with bounded exponential backoff
//!    ([`db::wait_until_ready`])
//! 3. Apply the idempotent schema
//! 4. Serve until Ctrl+C/SIGTERM

pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod http;
pub mod mail;
pub mod models;
pub mod state;

use std::sync::Arc;

use sqlx::PgPool;

pub use config::AppConfig;
pub use db::{Readiness, RetryPolicy};
pub use error::{Error, Result};
pub use state::AppState;

use config::DatabaseConfig;

/// Build the pool and run the readiness check against it.
///
/// The pool is returned only once the database has answered.
pub async fn connect(config: &DatabaseConfig) -> Result<(PgPool, Readiness)> {
    let options = config.connect_options().map_err(Error::DatabaseConfig)?;
    let pool = db::create_pool(config).map_err(Error::DatabaseConfig)?;

    tracing::info!(
        database = %config.redacted_url(),
        max_attempts = config.retry.attempts(),
        "waiting for database"
    );
    let probe = db::ConnectProbe::new(options, config.acquire_timeout);
    let readiness = db::wait_until_ready(&probe, &config.retry)
        .await
        .map_err(Error::Unreachable)?;
    tracing::info!(attempts = readiness.attempts, "database ready");

    Ok((pool, readiness))
}

/// Readiness check followed by migrations.
pub async fn prepare_database(config: &DatabaseConfig) -> Result<PgPool> {
    let (pool, _) = connect(config).await?;
    db::migrations::run(&pool).await?;
    Ok(pool)
}

/// Start the HTTP server.
///
/// Nothing is bound until the database is ready and migrated.
pub async fn serve(config: AppConfig) -> Result<()> {
    tracing::info!(profile = %config.profile, "starting proverbs server");
    let pool = prepare_database(&config.database).await?;
    let purged = db::SessionRepo::new(&pool).purge_expired().await?;
    if purged > 0 {
        tracing::info!(purged, "removed expired sessions");
    }

    let bind_addr = config.bind_addr;
    let state = AppState::new(pool, config)?;
    http::run_server(Arc::new(state), bind_addr).await?;
    Ok(())
}
