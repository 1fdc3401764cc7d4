//! # Auth Commands
//!
//! login, register, logout, refresh, whoami.

use clap::Args;
use tracing::warn;

use super::format_timestamp;
use crate::error::CliResult;
use crate::state::AppState;
use orderly_core::{Role, User};

#[derive(Debug, Args)]
pub struct Credentials {
    pub username: String,

    /// Password (or set ORDERLY_PASSWORD)
    #[arg(long, env = "ORDERLY_PASSWORD", hide_env_values = true)]
    pub password: String,
}

fn role_label(role: Option<Role>) -> &'static str {
    role.map(|r| r.as_str()).unwrap_or("unknown role")
}

pub async fn login(state: &AppState, credentials: Credentials) -> CliResult<()> {
    let user = state
        .auth
        .login(&credentials.username, &credentials.password)
        .await?;
    state.cart.claim(&user.username).await?;

    println!("Logged in as {} ({})", user.username, role_label(user.role()));
    Ok(())
}

pub async fn register(state: &AppState, credentials: Credentials) -> CliResult<()> {
    let user = state
        .auth
        .register(&credentials.username, &credentials.password)
        .await?;
    state.cart.claim(&user.username).await?;

    println!(
        "Registered and logged in as {} ({})",
        user.username,
        role_label(user.role())
    );
    Ok(())
}

pub async fn logout(state: &AppState) -> CliResult<()> {
    state.auth.logout().await?;
    state.cart.clear().await?;
    println!("Logged out");
    Ok(())
}

pub async fn refresh(state: &AppState) -> CliResult<()> {
    state.auth.refresh_token().await?;
    let expires = format_timestamp(state.auth.tokens().expires_at().await);
    println!("Session refreshed (expires {expires})");
    Ok(())
}

pub async fn whoami(state: &AppState) -> CliResult<()> {
    let profile = match state.api().users().me().await {
        Ok(me) => me,
        Err(e) if e.is_auth_error() => return Err(e.into()),
        Err(e) => {
            warn!(error = %e, "Profile fetch failed; showing stored details");
            match state.auth.current_user().await {
                Some(user) => user,
                None => return Err(e.into()),
            }
        }
    };

    let role = profile.role().or(state.auth.user_role().await);
    print!("{}", render_profile(&profile, role));
    Ok(())
}

pub fn render_profile(user: &User, role: Option<Role>) -> String {
    let mut out = String::new();
    out.push_str(&format!("Username:     {}\n", user.username));
    out.push_str(&format!("Role:         {}\n", role_label(role)));
    out.push_str(&format!(
        "Member since: {}\n",
        format_timestamp(user.created_at)
    ));
    out
}
