//! Role commands
//!
//! Commands: create, add, remove, list

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use proverbs_server::db::{RoleRepo, UserRepo};
use proverbs_server::models::RoleName;
use serde_json::json;

use super::DbArgs;

#[derive(Parser, Debug)]
pub struct RolesArgs {
    #[command(subcommand)]
    pub command: RolesCommands,

    #[command(flatten)]
    pub db: DbArgs,
}

#[derive(Subcommand, Debug)]
pub enum RolesCommands {
    /// Create a role (no-op if it exists)
    Create(CreateRoleArgs),
    /// Grant a role to a user
    Add(MembershipArgs),
    /// Revoke a role from a user
    Remove(MembershipArgs),
    /// List roles with member counts
    List(ListRolesArgs),
}

#[derive(Parser, Debug)]
pub struct CreateRoleArgs {
    /// Role name (lowercase slug)
    pub name: String,

    /// Human-readable description
    #[arg(long, short = 'd')]
    pub description: Option<String>,
}

#[derive(Parser, Debug)]
pub struct MembershipArgs {
    /// Username or email
    pub login: String,

    /// Role name
    pub role: String,
}

#[derive(Parser, Debug)]
pub struct ListRolesArgs {
    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

pub async fn run_roles(args: RolesArgs) -> Result<()> {
    let config = args.db.load_config()?;
    let pool = proverbs_server::prepare_database(&config.database)
        .await
        .context("database unavailable")?;
    let roles = RoleRepo::new(&pool);

    match args.command {
        RolesCommands::Create(create) => {
            let name = RoleName::new(&create.name)?;
            let role = roles
                .find_or_create(&name, create.description.as_deref())
                .await?;
            println!("role {} (id {})", role.name, role.id);
        }
        RolesCommands::Add(m) => {
            let user = UserRepo::new(&pool).get_by_login(&m.login).await?;
            let role = roles.get_by_name(&m.role).await?;
            if roles.add_to_user(user.id, role.id).await? {
                println!("granted {} to {}", role.name, user.username);
            } else {
                println!("{} already has {}", user.username, role.name);
            }
        }
        RolesCommands::Remove(m) => {
            let user = UserRepo::new(&pool).get_by_login(&m.login).await?;
            let role = roles.get_by_name(&m.role).await?;
            if roles.remove_from_user(user.id, role.id).await? {
                println!("revoked {} from {}", role.name, user.username);
            } else {
                println!("{} does not have {}", user.username, role.name);
            }
        }
        RolesCommands::List(list) => {
            let all = roles.list().await?;
            if list.json {
                let items: Vec<_> = all
                    .iter()
                    .map(|r| {
                        json!({
                            "name": r.name,
                            "description": r.description,
                            "members": r.member_count,
                        })
                    })
                    .collect();
                println!("{}", serde_json::to_string_pretty(&items)?);
            } else if all.is_empty() {
                println!("no roles");
            } else {
                for r in all {
                    println!(
                        "{:<20} {:>4} member(s)  {}",
                        r.name,
                        r.member_count,
                        r.description.as_deref().unwrap_or("")
                    );
                }
            }
        }
    }

    Ok(())
}
