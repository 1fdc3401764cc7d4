//! # Commands Module
//!
//! One module per screen of the ordering app.
//!
//! ## Command Guards
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  login / register / logout ─────────────────────────► run              │
//! │                                                                         │
//! │  everything else                                                        │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  is_logged_in()? ──no──► "Please log in first"                         │
//! │       │ yes                                                             │
//! │       ▼                                                                 │
//! │  should_refresh_token()? ──yes──► refresh (failure ends the session)   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  admin command? ──yes──► is_admin()? ──no──► "Admin access required"   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │      run                                                                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Commands
//! - [`auth`] - login, register, logout, refresh, whoami
//! - [`product`] - menu browsing and admin CRUD
//! - [`cart`] - local cart and checkout
//! - [`order`] - order history and admin status updates
//! - [`user`] - admin account management

pub mod auth;
pub mod cart;
pub mod order;
pub mod product;
pub mod user;

use clap::Subcommand;
use tracing::info;

use crate::error::{CliError, CliResult};
use crate::state::AppState;

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Sign in
    Login(auth::Credentials),

    /// Create an account and sign in
    Register(auth::Credentials),

    /// Sign out and empty the cart
    Logout,

    /// Exchange the session token for a fresh one
    Refresh,

    /// Show the signed-in profile
    Whoami,

    /// Browse the menu (admins can edit it)
    #[command(subcommand)]
    Products(product::ProductCommand),

    /// Build an order before checkout
    #[command(subcommand)]
    Cart(cart::CartCommand),

    /// Order history
    #[command(subcommand)]
    Orders(order::OrderCommand),

    /// Account management (admin)
    #[command(subcommand)]
    Users(user::UserCommand),
}

impl Command {
    pub fn name(&self) -> &'static str {
        match self {
            Command::Login(_) => "login",
            Command::Register(_) => "register",
            Command::Logout => "logout",
            Command::Refresh => "refresh",
            Command::Whoami => "whoami",
            Command::Products(_) => "products",
            Command::Cart(_) => "cart",
            Command::Orders(_) => "orders",
            Command::Users(_) => "users",
        }
    }
}

/// Runs `command`, applying the session guards first.
pub async fn dispatch(state: &AppState, command: Command) -> CliResult<()> {
    match command {
        Command::Login(credentials) => auth::login(state, credentials).await,
        Command::Register(credentials) => auth::register(state, credentials).await,
        Command::Logout => auth::logout(state).await,
        Command::Refresh => {
            require_login(state).await?;
            auth::refresh(state).await
        }
        command => {
            require_session(state).await?;
            match command {
                Command::Whoami => auth::whoami(state).await,
                Command::Products(cmd) => product::run(state, cmd).await,
                Command::Cart(cmd) => cart::run(state, cmd).await,
                Command::Orders(cmd) => order::run(state, cmd).await,
                Command::Users(cmd) => user::run(state, cmd).await,
                Command::Login(_)
                | Command::Register(_)
                | Command::Logout
                | Command::Refresh => Ok(()),
            }
        }
    }
}

async fn require_login(state: &AppState) -> CliResult<()> {
    if state.auth.is_logged_in().await {
        Ok(())
    } else {
        Err(CliError::not_logged_in())
    }
}

/// Logged in, with a token that is not about to expire.
pub async fn require_session(state: &AppState) -> CliResult<()> {
    require_login(state).await?;
    if state.auth.should_refresh_token().await {
        info!("Session token near expiry; refreshing");
        state.auth.refresh_token().await?;
    }
    Ok(())
}

pub async fn require_admin(state: &AppState) -> CliResult<()> {
    if state.auth.is_admin().await {
        Ok(())
    } else {
        Err(CliError::admin_required())
    }
}

/// `2024-03-01 12:00`, or `-` when unknown.
pub(crate) fn format_timestamp(ts: Option<chrono::DateTime<chrono::Utc>>) -> String {
    ts.map(|t| t.format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_else(|| "-".to_string())
}

/// Cuts `text` to `max` characters, marking the cut with `…`.
pub(crate) fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let cut: String = text.chars().take(max.saturating_sub(1)).collect();
    format!("{cut}…")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("Ramen", 10), "Ramen");
        assert_eq!(truncate("Spicy miso ramen", 6), "Spicy…");
    }

    #[test]
    fn test_format_timestamp() {
        let ts = chrono::Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).single();
        assert_eq!(format_timestamp(ts), "2024-03-01 12:00");
        assert_eq!(format_timestamp(None), "-");
    }
}
