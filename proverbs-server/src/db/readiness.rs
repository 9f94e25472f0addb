//! Startup readiness check
//!
//! The server must not accept traffic until the database answers a trivial
//! round-trip. A database that is still starting (typical for a container
//! brought up alongside the app) is tolerated by retrying with exponential
//! backoff: a failed attempt `i` (0-indexed) is followed by a pause of
//! `base_delay * 2^i`. There is no pause after the last attempt; its error is
//! handed back to the caller unchanged.

use std::fmt::Display;
use std::time::Duration;

use async_trait::async_trait;
use sqlx::postgres::{PgConnectOptions, PgConnection};
use sqlx::Connection;
use tracing::{debug, error, warn};

/// Default number of attempts before giving up.
pub const DEFAULT_MAX_ATTEMPTS: u32 = 5;

/// Default backoff time unit.
pub const DEFAULT_BASE_DELAY: Duration = Duration::from_secs(1);

/// Bounded exponential backoff
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts, including the first. Zero behaves as one.
    pub max_attempts: u32,
    /// Pause after the first failed attempt; doubled after each further one.
    pub base_delay: Duration,
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, base_delay: Duration) -> Self {
        Self {
            max_attempts,
            base_delay,
        }
    }

    /// Number of attempts actually made when every one fails.
    pub fn attempts(&self) -> u32 {
        self.max_attempts.max(1)
    }

    /// Pause after failed attempt `attempt` (0-indexed): `base_delay * 2^attempt`.
    pub fn delay_for(&self, attempt: u32) -> Duration {
        let factor = 2u32.checked_pow(attempt).unwrap_or(u32::MAX);
        self.base_delay.saturating_mul(factor)
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_ATTEMPTS, DEFAULT_BASE_DELAY)
    }
}

/// Outcome of a successful readiness check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Readiness {
    /// Attempts made, including the successful one.
    pub attempts: u32,
}

/// A single database round-trip.
///
/// Implementations must leave no transaction open when `ping` fails.
#[async_trait]
pub trait Probe: Send + Sync {
    type Error: Display + Send;

    async fn ping(&self) -> Result<(), Self::Error>;
}

/// Opens one connection per ping, outside any pool.
///
/// A pool retries failed connects internally until its acquire timeout and
/// then reports only the timeout; a direct connection hands back the driver's
/// own error (refused, auth failure, unknown database) right away.
#[derive(Debug, Clone)]
pub struct ConnectProbe {
    options: PgConnectOptions,
    connect_timeout: Duration,
}

impl ConnectProbe {
    pub fn new(options: PgConnectOptions, connect_timeout: Duration) -> Self {
        Self {
            options,
            connect_timeout,
        }
    }
}

/// `SELECT 1` inside a transaction that is committed on success and rolled
/// back on failure.
#[async_trait]
impl Probe for ConnectProbe {
    type Error = sqlx::Error;

    async fn ping(&self) -> Result<(), sqlx::Error> {
        let connecting = PgConnection::connect_with(&self.options);
        let mut conn = match tokio::time::timeout(self.connect_timeout, connecting).await {
            Ok(conn) => conn?,
            Err(_) => {
                return Err(sqlx::Error::Io(std::io::Error::new(
                    std::io::ErrorKind::TimedOut,
                    format!("no connection within {:?}", self.connect_timeout),
                )))
            }
        };

        let result = round_trip(&mut conn, "SELECT 1").await;
        if let Err(e) = conn.close().await {
            debug!(error = %e, "closing probe connection failed");
        }
        result
    }
}

/// Run `sql` in its own transaction on `conn`.
///
/// On failure the transaction is rolled back before the error is returned,
/// so `conn` is left outside any transaction either way.
async fn round_trip(conn: &mut PgConnection, sql: &'static str) -> Result<(), sqlx::Error> {
    let mut tx = conn.begin().await?;
    match sqlx::Executor::execute(&mut *tx, sqlx::raw_sql(sql)).await {
        Ok(_) => tx.commit().await,
        Err(err) => {
            if let Err(rollback) = tx.rollback().await {
                debug!(error = %rollback, "rollback after failed ping also failed");
            }
            Err(err)
        }
    }
}

/// Ping until the database answers or the policy is exhausted.
///
/// Returns the error of the final attempt when every attempt fails.
pub async fn wait_until_ready<P>(probe: &P, policy: &RetryPolicy) -> Result<Readiness, P::Error>
where
    P: Probe + ?Sized,
{
    let max_attempts = policy.attempts();
    let mut attempt = 0;

    loop {
        match probe.ping().await {
            Ok(()) => {
                debug!(attempts = attempt + 1, "database ready");
                return Ok(Readiness {
                    attempts: attempt + 1,
                });
            }
            Err(err) if attempt + 1 >= max_attempts => {
                error!(
                    attempt = attempt + 1,
                    max_attempts,
                    error = %err,
                    "database unreachable, giving up"
                );
                return Err(err);
            }
            Err(err) => {
                let delay = policy.delay_for(attempt);
                warn!(
                    attempt = attempt + 1,
                    max_attempts,
                    delay_ms = delay.as_millis() as u64,
                    error = %err,
                    "database not ready, retrying"
                );
                tokio::time::sleep(delay).await;
            }
        }
        attempt += 1;
    }
}
