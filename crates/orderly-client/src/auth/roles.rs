//! # Role Resolution
//!
//! The backend does not always say what role a user has. A [`RolePolicy`]
//! is an ordered list of ways to find out; the first one that answers wins.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Login Policy                                     │
//! │                                                                         │
//! │  Inline ──none──► FetchById ──none──► AdminProbe                       │
//! │    │                  │                   │                             │
//! │  response.user     GET users/{id}      GET users                        │
//! │  .role             (id from JWT)        2xx → Admin                     │
//! │                                         err → Customer                  │
//! │                                                                         │
//! │                     Registration Policy                                 │
//! │                                                                         │
//! │  Inline ──none──► Default(role)     (auth.registration_default_role)   │
//! │                   or the login policy when set to "probe"              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use tracing::{debug, warn};

use crate::config::RegistrationRole;
use crate::repository::OrderlyApi;
use orderly_core::{Role, User};

/// One way of finding out the role.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoleStrategy {
    /// The role the backend put in the response.
    Inline,
    /// Fetch the user whose id the token carries.
    FetchById,
    /// Call the admin-only user listing. Always answers.
    AdminProbe,
    /// A fixed answer.
    Default(Role),
}

/// What a policy found out.
#[derive(Debug, Clone, Default)]
pub struct Resolution {
    pub role: Option<Role>,
    pub source: Option<RoleStrategy>,
    /// The account fetched by [`RoleStrategy::FetchById`], if the fetch
    /// succeeded (even when it carried no usable role).
    pub fetched_user: Option<User>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RolePolicy {
    strategies: Vec<RoleStrategy>,
}

impl RolePolicy {
    pub fn new(strategies: Vec<RoleStrategy>) -> Self {
        Self { strategies }
    }

    /// Inline, then fetch by id, then the admin probe.
    pub fn login() -> Self {
        Self::new(vec![
            RoleStrategy::Inline,
            RoleStrategy::FetchById,
            RoleStrategy::AdminProbe,
        ])
    }

    pub fn registration(default: RegistrationRole) -> Self {
        match default.fixed_role() {
            Some(role) => Self::new(vec![RoleStrategy::Inline, RoleStrategy::Default(role)]),
            None => Self::login(),
        }
    }

    pub fn strategies(&self) -> &[RoleStrategy] {
        &self.strategies
    }

    /// Runs the strategies in order and stops at the first role.
    pub async fn resolve(&self, api: &OrderlyApi, inline: Option<&User>) -> Resolution {
        let mut resolution = Resolution::default();

        for strategy in &self.strategies {
            let role = match strategy {
                RoleStrategy::Inline => inline.and_then(User::role),
                RoleStrategy::FetchById => {
                    let fetched = fetch_by_id(api).await;
                    let role = fetched.as_ref().and_then(User::role);
                    if fetched.is_some() {
                        resolution.fetched_user = fetched;
                    }
                    role
                }
                RoleStrategy::AdminProbe => Some(admin_probe(api).await),
                RoleStrategy::Default(role) => {
                    warn!(%role, "No role data from backend; assuming configured default");
                    Some(*role)
                }
            };

            if let Some(role) = role {
                debug!(?strategy, %role, "Role resolved");
                resolution.role = Some(role);
                resolution.source = Some(*strategy);
                return resolution;
            }
            debug!(?strategy, "Strategy gave no role");
        }

        resolution
    }
}

async fn fetch_by_id(api: &OrderlyApi) -> Option<User> {
    let id = api.tokens().user_id().await?;
    match api.users().get(id).await {
        Ok(user) => Some(user),
        Err(e) => {
            debug!(user_id = id, error = %e, "Fetch by id failed");
            None
        }
    }
}

/// Any success means the token may list users, which only admins may do.
async fn admin_probe(api: &OrderlyApi) -> Role {
    match api.users().all().await {
        Ok(_) => Role::Admin,
        Err(e) => {
            debug!(error = %e, "Admin probe refused");
            Role::Customer
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registration_policies() {
        assert_eq!(
            RolePolicy::registration(RegistrationRole::Admin).strategies(),
            &[RoleStrategy::Inline, RoleStrategy::Default(Role::Admin)]
        );
        assert_eq!(
            RolePolicy::registration(RegistrationRole::Customer).strategies(),
            &[RoleStrategy::Inline, RoleStrategy::Default(Role::Customer)]
        );
        assert_eq!(
            RolePolicy::registration(RegistrationRole::Probe),
            RolePolicy::login()
        );
    }
}
