//! Error types for proverbs-server startup

use thiserror::Error;

use crate::config::ConfigError;
use crate::db::DbError;
use crate::http::ServerError;

pub type Result<T> = std::result::Result<T, Error>;

/// Errors that abort startup or the serve loop.
///
/// Request-level failures never reach this type; handlers return
/// [`crate::http::ApiError`] instead.
#[derive(Error, Debug)]
pub enum Error {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("invalid database configuration: {0}")]
    DatabaseConfig(#[source] sqlx::Error),

    #[error("database unreachable: {0}")]
    Unreachable(#[source] sqlx::Error),

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error(transparent)]
    Repo(#[from] DbError),

    #[error("template error: {0}")]
    Template(#[from] tera::Error),

    #[error(transparent)]
    Server(#[from] ServerError),
}
