//! proverbs CLI - run and administer the proverbs server
//!
//! - `serve`: wait for the database, migrate, serve HTTP
//! - `check-db`: readiness check only
//! - `users` / `roles`: account administration

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};

mod commands;
mod tracing_setup;

#[derive(Parser, Debug)]
#[command(
    name = "proverbs",
    author,
    version,
    about = "Authenticated proverb listing server",
    long_about = "Serve the proverbs web app and manage its accounts. Configuration comes from \
                  the environment (a .env file is honoured); flags override it."
)]
struct Cli {
    /// Debug logging (RUST_LOG still wins when set)
    #[arg(long, global = true)]
    debug: bool,

    /// Export traces over OTLP
    #[cfg(feature = "telemetry")]
    #[arg(long, global = true)]
    otel: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the HTTP server (readiness check, migrations, serve)
    Serve(commands::serve::ServeArgs),
    /// Check that the database answers, retrying with backoff
    CheckDb(commands::check_db::CheckDbArgs),
    /// Manage user accounts (create, activate, deactivate)
    Users(commands::users::UsersArgs),
    /// Manage roles (create, add, remove, list)
    Roles(commands::roles::RolesArgs),
    /// Generate shell completion scripts
    Completions(CompletionsArgs),
}

#[derive(Parser, Debug)]
struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    shell: Shell,
}

#[derive(ValueEnum, Debug, Clone, Copy)]
#[allow(clippy::enum_variant_names)] // PowerShell is a proper noun, not a suffix
enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
    Elvish,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let tracing_config = tracing_setup::TracingConfig {
        debug: cli.debug,
        #[cfg(feature = "telemetry")]
        otel: cli.otel,
        ..Default::default()
    };
    tracing_setup::init(&tracing_config).ok();

    let result = match cli.command {
        Commands::Serve(args) => commands::run_serve(args).await,
        Commands::CheckDb(args) => commands::run_check_db(args).await,
        Commands::Users(args) => commands::run_users(args).await,
        Commands::Roles(args) => commands::run_roles(args).await,
        Commands::Completions(args) => run_completions(args),
    };

    tracing_setup::shutdown_otel();
    result
}

fn run_completions(args: CompletionsArgs) -> Result<()> {
    use clap::CommandFactory;
    use clap_complete::{generate, Shell as CompletionShell};
    use std::io;

    let mut cmd = Cli::command();
    let bin_name = cmd.get_name().to_string();

    let shell = match args.shell {
        Shell::Bash => CompletionShell::Bash,
        Shell::Zsh => CompletionShell::Zsh,
        Shell::Fish => CompletionShell::Fish,
        Shell::PowerShell => CompletionShell::PowerShell,
        Shell::Elvish => CompletionShell::Elvish,
    };

    generate(shell, &mut cmd, bin_name, &mut io::stdout());

    Ok(())
}
