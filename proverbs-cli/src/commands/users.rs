//! User account commands
//!
//! Commands: create, activate, deactivate

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use proverbs_server::auth::Passwords;
use proverbs_server::db::{NewUser, UserRepo};
use proverbs_server::models::{Email, Password, Username};
use tracing::info;

use super::DbArgs;

#[derive(Parser, Debug)]
pub struct UsersArgs {
    #[command(subcommand)]
    pub command: UsersCommands,

    #[command(flatten)]
    pub db: DbArgs,
}

#[derive(Subcommand, Debug)]
pub enum UsersCommands {
    /// Create an account (prompts for the password if not given)
    Create(CreateUserArgs),
    /// Allow a user to log in
    Activate(LoginArg),
    /// Stop a user from logging in and end their sessions
    Deactivate(LoginArg),
}

#[derive(Parser, Debug)]
pub struct CreateUserArgs {
    /// Username (3-32 characters)
    pub username: String,

    /// Email address
    pub email: String,

    /// Password (prompted when omitted)
    #[arg(long)]
    pub password: Option<String>,

    /// Create the account deactivated
    #[arg(long)]
    pub inactive: bool,
}

#[derive(Parser, Debug)]
pub struct LoginArg {
    /// Username or email
    pub login: String,
}

pub async fn run_users(args: UsersArgs) -> Result<()> {
    let config = args.db.load_config()?;
    let pool = proverbs_server::prepare_database(&config.database)
        .await
        .context("database unavailable")?;
    let users = UserRepo::new(&pool);

    match args.command {
        UsersCommands::Create(create) => {
            let username = Username::new(&create.username)?;
            let email = Email::new(&create.email)?;
            let password = match create.password {
                Some(password) => Password::new(&password)?,
                None => prompt_password()?,
            };

            let password_hash = Passwords::new(&config.security.password_salt)
                .hash(password.expose())
                .context("failed to hash password")?;
            let user = users
                .create(NewUser {
                    username,
                    email,
                    password_hash,
                    active: !create.inactive,
                })
                .await?;

            info!(user = %user.username, id = user.id, "user created");
            println!(
                "created user {} <{}>{}",
                user.username,
                user.email,
                if user.active { "" } else { " (inactive)" }
            );
        }
        UsersCommands::Activate(arg) => {
            let user = users.set_active(&arg.login, true).await?;
            println!("activated {}", user.username);
        }
        UsersCommands::Deactivate(arg) => {
            let user = users.set_active(&arg.login, false).await?;
            let ended = proverbs_server::db::SessionRepo::new(&pool)
                .delete_for_user(user.id)
                .await?;
            println!("deactivated {} ({} session(s) ended)", user.username, ended);
        }
    }

    Ok(())
}

fn prompt_password() -> Result<Password> {
    let raw = inquire::Password::new("Password:")
        .with_display_mode(inquire::PasswordDisplayMode::Masked)
        .with_custom_confirmation_message("Confirm password:")
        .with_custom_confirmation_error_message("Passwords don't match")
        .prompt()
        .context("password prompt cancelled")?;
    Ok(Password::new(&raw)?)
}
