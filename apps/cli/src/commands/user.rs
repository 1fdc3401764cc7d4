//! # User Commands
//!
//! Account management. Every subcommand is admin-only, and admin accounts
//! cannot be deleted from here.

use clap::Subcommand;

use super::{format_timestamp, require_admin};
use crate::error::{CliError, CliResult, ErrorCode};
use crate::state::AppState;
use orderly_core::validation::{validate_id, validate_new_password, validate_username};
use orderly_core::{CreateUserRequest, Role, UpdateUserRequest, User};

#[derive(Debug, Subcommand)]
pub enum UserCommand {
    /// List accounts
    List,

    /// Show one account
    Show { id: i64 },

    /// Create an account
    Create {
        username: String,

        #[arg(long, env = "ORDERLY_NEW_PASSWORD", hide_env_values = true)]
        password: String,

        /// admin or customer
        #[arg(long, default_value = "customer")]
        role: Role,
    },

    /// Change an account
    Update {
        id: i64,

        #[arg(long)]
        username: Option<String>,

        #[arg(long)]
        password: Option<String>,

        #[arg(long)]
        role: Option<Role>,
    },

    /// Delete a customer account
    Delete { id: i64 },
}

pub async fn run(state: &AppState, command: UserCommand) -> CliResult<()> {
    require_admin(state).await?;
    let users = state.api().users();

    match command {
        UserCommand::List => {
            let all = users.all().await?;
            print!("{}", render_users(&all));
        }
        UserCommand::Show { id } => {
            validate_id("user id", id)?;
            let user = users.get(id).await?;
            print!("{}", render_users(std::slice::from_ref(&user)));
        }
        UserCommand::Create {
            username,
            password,
            role,
        } => {
            let username = username.trim().to_string();
            validate_username(&username)?;
            validate_new_password(&password)?;

            let created = users
                .create(&CreateUserRequest {
                    username,
                    password,
                    role,
                })
                .await?;
            println!("Created user {} ({})", created.username, role);
        }
        UserCommand::Update {
            id,
            username,
            password,
            role,
        } => {
            validate_id("user id", id)?;
            let changes = UpdateUserRequest {
                username: username.map(|u| u.trim().to_string()),
                password,
                role,
            };
            if changes.username.is_none() && changes.password.is_none() && changes.role.is_none()
            {
                return Err(CliError::validation("Nothing to update"));
            }
            if let Some(name) = &changes.username {
                validate_username(name)?;
            }
            if let Some(password) = &changes.password {
                validate_new_password(password)?;
            }

            let updated = users.update(id, &changes).await?;
            println!("Updated user #{id} {}", updated.username);
        }
        UserCommand::Delete { id } => {
            validate_id("user id", id)?;
            let target = users.get(id).await?;
            if target.is_admin() {
                return Err(CliError::new(
                    ErrorCode::Forbidden,
                    "Admin accounts cannot be deleted",
                ));
            }
            users.delete(id).await?;
            println!("Deleted user {}", target.username);
        }
    }
    Ok(())
}

pub fn render_users(users: &[User]) -> String {
    if users.is_empty() {
        return "No users\n".to_string();
    }

    let mut out = String::new();
    for u in users {
        let id = u
            .user_id
            .map(|id| format!("#{id}"))
            .unwrap_or_else(|| "-".to_string());
        let role = u
            .role()
            .map(|r| r.as_str().to_string())
            .or_else(|| u.role.as_ref().map(|r| r.name().to_string()))
            .unwrap_or_else(|| "-".to_string());
        out.push_str(&format!(
            "{:<6} {:<24} {:<10} {}\n",
            id,
            u.username,
            role,
            format_timestamp(u.created_at),
        ));
    }
    out
}
