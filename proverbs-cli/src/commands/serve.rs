//! HTTP server command

use std::net::SocketAddr;

use anyhow::{Context, Result};
use clap::Parser;

use super::DbArgs;

/// Arguments for the serve command
#[derive(Parser, Debug)]
pub struct ServeArgs {
    /// Address to bind to (default: 0.0.0.0:5000)
    #[arg(long, short = 'b', env = "APP_BIND")]
    pub bind: Option<SocketAddr>,

    #[command(flatten)]
    pub db: DbArgs,
}

/// Run the HTTP server
pub async fn run_serve(args: ServeArgs) -> Result<()> {
    let mut config = args.db.load_config()?;
    if let Some(bind) = args.bind {
        config.bind_addr = bind;
    }

    // Blocks until shutdown
    proverbs_server::serve(config)
        .await
        .context("Server error")?;

    Ok(())
}
