//! Command implementations for the proverbs CLI

pub mod check_db;
pub mod roles;
pub mod serve;
pub mod users;

use anyhow::{Context, Result};
use clap::Args;
use proverbs_server::AppConfig;

// Re-export main dispatcher functions for flat access from main.rs
pub use check_db::run_check_db;
pub use roles::run_roles;
pub use serve::run_serve;
pub use users::run_users;

/// Database flags shared by every command that connects
///
/// Global, so `users`/`roles` accept them after the subcommand as well.
#[derive(Args, Debug, Clone, Default)]
pub struct DbArgs {
    /// Database URL (overrides the DB_* variables)
    #[arg(long, global = true, env = "DATABASE_URL")]
    pub database_url: Option<String>,

    /// Readiness attempts before giving up
    #[arg(long, global = true, env = "DB_MAX_CONNECTION_RETRIES")]
    pub max_retries: Option<u32>,
}

impl DbArgs {
    /// Environment configuration with these flags applied on top.
    pub fn load_config(&self) -> Result<AppConfig> {
        let mut config = AppConfig::from_env().context("failed to load configuration")?;
        if let Some(url) = &self.database_url {
            config.database.url = Some(url.clone());
        }
        if let Some(attempts) = self.max_retries {
            config.database.retry.max_attempts = attempts;
        }
        Ok(config)
    }
}
