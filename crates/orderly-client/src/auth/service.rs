//! # Auth Service
//!
//! Owns the signed-in user: establishes the session on login or
//! registration, refreshes it, answers "who is this and what may they do",
//! and tears it down.
//!
//! ## Login Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                            login()                                      │
//! │                                                                         │
//! │  validate input ──► POST auth/login ──err──► return error (no token)   │
//! │                            │                                            │
//! │                            ▼ ok                                         │
//! │                     save token (+ expiry)                               │
//! │                     save username (response, else typed)                │
//! │                            │                                            │
//! │                            ▼                                            │
//! │                     RolePolicy::resolve                                 │
//! │                     ├─ fetched user → save server username              │
//! │                     └─ role → save role                                 │
//! │                            │                                            │
//! │                            ▼                                            │
//! │                     current_user = Some(user)                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::Utc;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{info, warn};

use super::roles::RolePolicy;
use crate::config::AuthSettings;
use crate::error::{ClientError, ClientResult};
use crate::repository::OrderlyApi;
use crate::token::TokenManager;
use orderly_core::validation::{validate_login_password, validate_new_password, validate_username};
use orderly_core::{LoginRequest, LoginResponse, NewUser, Role, RoleField, User};

#[derive(Debug, Clone)]
pub struct AuthService {
    api: OrderlyApi,
    login_policy: RolePolicy,
    registration_policy: RolePolicy,
    current_user: Arc<RwLock<Option<User>>>,
}

impl AuthService {
    pub fn new(api: OrderlyApi, settings: &AuthSettings) -> Self {
        Self::with_policies(
            api,
            RolePolicy::login(),
            RolePolicy::registration(settings.registration_default_role),
        )
    }

    pub fn with_policies(
        api: OrderlyApi,
        login_policy: RolePolicy,
        registration_policy: RolePolicy,
    ) -> Self {
        Self {
            api,
            login_policy,
            registration_policy,
            current_user: Arc::new(RwLock::new(None)),
        }
    }

    pub fn api(&self) -> &OrderlyApi {
        &self.api
    }

    pub fn tokens(&self) -> &TokenManager {
        self.api.tokens()
    }

    // =========================================================================
    // Establishing a Session
    // =========================================================================

    pub async fn login(&self, username: &str, password: &str) -> ClientResult<User> {
        let username = username.trim();
        validate_username(username)?;
        validate_login_password(password)?;

        let response = self
            .api
            .auth()
            .login(&LoginRequest {
                username: username.to_string(),
                password: password.to_string(),
            })
            .await?;

        let user = self.establish(response, username, &self.login_policy).await?;
        info!(username = %user.username, role = ?user.role(), "Logged in");
        Ok(user)
    }

    pub async fn register(&self, username: &str, password: &str) -> ClientResult<User> {
        let username = username.trim();
        validate_username(username)?;
        validate_new_password(password)?;

        let response = self
            .api
            .auth()
            .register(&NewUser {
                username: username.to_string(),
                password: password.to_string(),
            })
            .await?;

        let user = self
            .establish(response, username, &self.registration_policy)
            .await?;
        info!(username = %user.username, role = ?user.role(), "Registered");
        Ok(user)
    }

    async fn establish(
        &self,
        response: LoginResponse,
        typed_username: &str,
        policy: &RolePolicy,
    ) -> ClientResult<User> {
        if response.token.trim().is_empty() {
            return Err(ClientError::Decode("response carried no token".into()));
        }

        let tokens = self.tokens();
        tokens.save_token(&response.token).await?;

        let inline = response.user;
        let username = inline
            .as_ref()
            .map(|u| u.username.trim())
            .filter(|name| !name.is_empty())
            .unwrap_or(typed_username)
            .to_string();
        tokens.save_username(&username).await?;

        let resolution = policy.resolve(&self.api, inline.as_ref()).await;

        // A 401 during resolution clears the token we just saved.
        if tokens.token().await.as_deref() != Some(response.token.as_str()) {
            warn!("Session rejected while resolving role");
            self.end_session().await;
            return Err(ClientError::Unauthorized(
                "session was rejected while resolving the role".into(),
            ));
        }

        let mut user = match (resolution.fetched_user, inline) {
            (Some(fetched), _) if !fetched.username.trim().is_empty() => {
                tokens.save_username(&fetched.username).await?;
                fetched
            }
            (_, Some(mut inline)) => {
                inline.username = username;
                inline
            }
            _ => User::local(username, None),
        };

        if let Some(role) = resolution.role {
            tokens.save_user_role(role).await?;
            user.role = Some(RoleField::from(role));
        }

        *self.current_user.write().await = Some(user.clone());
        Ok(user)
    }

    // =========================================================================
    // Keeping a Session
    // =========================================================================

    /// Swaps the token for a fresh one. Any failure ends the session.
    pub async fn refresh_token(&self) -> ClientResult<()> {
        match self.api.auth().refresh().await {
            Ok(response) if !response.token.trim().is_empty() => {
                self.tokens().save_token(&response.token).await?;

                if let Some(role) = response.user.as_ref().and_then(User::role) {
                    self.tokens().save_user_role(role).await?;
                    if let Some(user) = self.current_user.write().await.as_mut() {
                        user.role = Some(RoleField::from(role));
                    }
                }
                info!("Token refreshed");
                Ok(())
            }
            Ok(_) => {
                warn!("Refresh returned no token; ending session");
                self.end_session().await;
                Err(ClientError::Decode("refresh response carried no token".into()))
            }
            Err(e) => {
                warn!(error = %e, "Token refresh failed; ending session");
                self.end_session().await;
                Err(e)
            }
        }
    }

    pub async fn should_refresh_token(&self) -> bool {
        self.tokens().should_refresh_token().await
    }

    /// A valid token and a username. Anything else is cleared.
    pub async fn is_logged_in(&self) -> bool {
        let session = self.tokens().snapshot().await;
        if session.is_fully_authenticated(Utc::now()) {
            return true;
        }

        if !session.is_empty() {
            warn!(
                token_valid = session.is_token_valid(Utc::now()),
                has_username = session.has_username(),
                "Incomplete session; clearing"
            );
            self.end_session().await;
        }
        false
    }

    pub async fn logout(&self) -> ClientResult<()> {
        *self.current_user.write().await = None;
        self.tokens().clear().await?;
        info!("Logged out");
        Ok(())
    }

    async fn end_session(&self) {
        *self.current_user.write().await = None;
        if let Err(e) = self.tokens().clear().await {
            warn!(error = %e, "Failed to clear session");
        }
    }

    // =========================================================================
    // Who Is Signed In
    // =========================================================================

    pub async fn current_user(&self) -> Option<User> {
        self.current_user.read().await.clone()
    }

    /// The in-memory user's role, else the persisted one.
    pub async fn user_role(&self) -> Option<Role> {
        if let Some(role) = self.current_user.read().await.as_ref().and_then(User::role) {
            return Some(role);
        }
        self.tokens().user_role().await
    }

    pub async fn is_admin(&self) -> bool {
        self.user_role().await == Some(Role::Admin)
    }

    pub async fn is_customer(&self) -> bool {
        self.user_role().await == Some(Role::Customer)
    }

    /// Rebuilds the in-memory user from the persisted session.
    pub async fn load_stored_user_info(&self) -> Option<User> {
        let session = self.tokens().snapshot().await;
        let username = session.username.filter(|name| !name.trim().is_empty())?;
        let user = User::local(username, session.role);
        *self.current_user.write().await = Some(user.clone());
        Some(user)
    }

    /// Records a role worked out elsewhere.
    pub async fn set_user_role(&self, role: Role) -> ClientResult<()> {
        self.tokens().save_user_role(role).await?;
        if let Some(user) = self.current_user.write().await.as_mut() {
            user.role = Some(RoleField::from(role));
        }
        Ok(())
    }
}
