//! Database readiness check command

use anyhow::{Context, Result};
use clap::Parser;

use super::DbArgs;

/// Arguments for the check-db command
#[derive(Parser, Debug)]
pub struct CheckDbArgs {
    #[command(flatten)]
    pub db: DbArgs,
}

/// Wait for the database; exit non-zero if it never answers.
pub async fn run_check_db(args: CheckDbArgs) -> Result<()> {
    let config = args.db.load_config()?;

    let (pool, readiness) = proverbs_server::connect(&config.database)
        .await
        .context("database check failed")?;
    pool.close().await;

    println!(
        "database ready ({} attempt{})",
        readiness.attempts,
        if readiness.attempts == 1 { "" } else { "s" }
    );
    Ok(())
}
