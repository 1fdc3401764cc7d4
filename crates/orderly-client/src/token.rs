//! # Token Store
//!
//! Holds the session token, its expiry, the username and the role, and
//! writes every change through to a [`SessionStore`].
//!
//! ## Session Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                          Session Lifecycle                              │
//! │                                                                         │
//! │  ┌────────────┐  save_token   ┌────────────┐  save_username  ┌───────┐ │
//! │  │   empty    │──────────────►│ token only │────────────────►│ full  │ │
//! │  └────────────┘               └────────────┘  save_user_role └───┬───┘ │
//! │        ▲                                                         │     │
//! │        │        clear() ◄── logout, refresh failure, HTTP 401    │     │
//! │        └─────────────────────────────────────────────────────────┘     │
//! │                                                                         │
//! │  Reads come from memory. Writes go to the store first, then memory,    │
//! │  so a failed write never leaves the two disagreeing.                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Expiry
//! The token is a JWT in practice. Its `exp` claim is read (the signature is
//! not checked: the client only ever reads its own token). Opaque tokens get
//! `now + token_ttl` (24 h by default).

use async_trait::async_trait;
use chrono::{DateTime, Duration, TimeZone, Utc};
use jsonwebtoken::{DecodingKey, Validation};
use serde::Deserialize;
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};
use tracing::{debug, warn};

use crate::error::ClientResult;
use orderly_core::{Role, Session};

/// Margin before token expiration to trigger refresh (5 minutes)
pub const REFRESH_MARGIN_SECS: i64 = 300;

/// Lifetime assumed for tokens without an `exp` claim (24 hours)
pub const DEFAULT_TOKEN_TTL_SECS: i64 = 24 * 60 * 60;

// =============================================================================
// Persistence Seam
// =============================================================================

/// Where the session survives between runs.
#[async_trait]
pub trait SessionStore: Send + Sync {
    async fn load(&self) -> ClientResult<Session>;
    async fn save(&self, session: &Session) -> ClientResult<()>;
    async fn clear(&self) -> ClientResult<()>;
}

/// Keeps the session in memory only. Used by tests and one-shot tools.
#[derive(Debug, Default)]
pub struct MemorySessionStore {
    session: Mutex<Session>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_session(session: Session) -> Self {
        Self {
            session: Mutex::new(session),
        }
    }

    /// What has been persisted so far.
    pub async fn persisted(&self) -> Session {
        self.session.lock().await.clone()
    }
}

#[async_trait]
impl SessionStore for MemorySessionStore {
    async fn load(&self) -> ClientResult<Session> {
        Ok(self.session.lock().await.clone())
    }

    async fn save(&self, session: &Session) -> ClientResult<()> {
        *self.session.lock().await = session.clone();
        Ok(())
    }

    async fn clear(&self) -> ClientResult<()> {
        self.session.lock().await.clear();
        Ok(())
    }
}

// =============================================================================
// Token Claims
// =============================================================================

/// The claims this client cares about. Everything else is ignored.
#[derive(Debug, Default, Deserialize)]
struct Claims {
    #[serde(default)]
    exp: Option<i64>,
    #[serde(default)]
    user_id: Option<serde_json::Value>,
    #[serde(default)]
    id: Option<serde_json::Value>,
    #[serde(default)]
    sub: Option<serde_json::Value>,
}

impl Claims {
    /// Reads the payload of a JWT without verifying it. `None` for opaque
    /// tokens.
    fn read(token: &str) -> Option<Claims> {
        let header = jsonwebtoken::decode_header(token).ok()?;

        let mut validation = Validation::new(header.alg);
        validation.insecure_disable_signature_validation();
        validation.validate_exp = false;
        validation.validate_aud = false;
        validation.required_spec_claims.clear();

        jsonwebtoken::decode::<Claims>(token, &DecodingKey::from_secret(&[]), &validation)
            .ok()
            .map(|data| data.claims)
    }

    fn expires_at(&self) -> Option<DateTime<Utc>> {
        self.exp.and_then(|exp| Utc.timestamp_opt(exp, 0).single())
    }

    /// `user_id`, then `id`, then a numeric `sub`.
    fn user_id(&self) -> Option<i64> {
        [&self.user_id, &self.id, &self.sub]
            .into_iter()
            .flatten()
            .find_map(as_id)
    }
}

fn as_id(value: &serde_json::Value) -> Option<i64> {
    match value {
        serde_json::Value::Number(n) => n.as_i64(),
        serde_json::Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

// =============================================================================
// Token Manager
// =============================================================================

/// Shared handle to the session. Cloning is cheap; every clone sees the same
/// session.
///
/// ## Usage
/// ```rust,ignore
/// let tokens = TokenManager::open(store, config.token_ttl(), config.refresh_margin()).await?;
/// tokens.save_token(&response.token).await?;
/// if tokens.should_refresh_token().await { /* refresh */ }
/// ```
#[derive(Clone)]
pub struct TokenManager {
    session: Arc<RwLock<Session>>,
    store: Arc<dyn SessionStore>,
    token_ttl: Duration,
    refresh_margin: Duration,
}

impl std::fmt::Debug for TokenManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenManager")
            .field("token_ttl", &self.token_ttl)
            .field("refresh_margin", &self.refresh_margin)
            .finish_non_exhaustive()
    }
}

impl TokenManager {
    /// Loads the persisted session from `store`.
    pub async fn open(
        store: Arc<dyn SessionStore>,
        token_ttl: Duration,
        refresh_margin: Duration,
    ) -> ClientResult<Self> {
        let session = store.load().await?;
        debug!(
            has_token = session.token.is_some(),
            has_username = session.has_username(),
            "Session loaded"
        );

        Ok(Self {
            session: Arc::new(RwLock::new(session)),
            store,
            token_ttl,
            refresh_margin,
        })
    }

    /// A manager over a fresh in-memory store with default timings.
    pub fn in_memory() -> Self {
        Self {
            session: Arc::new(RwLock::new(Session::default())),
            store: Arc::new(MemorySessionStore::new()),
            token_ttl: Duration::seconds(DEFAULT_TOKEN_TTL_SECS),
            refresh_margin: Duration::seconds(REFRESH_MARGIN_SECS),
        }
    }

    /// Applies `change` to a copy, persists it, then publishes it.
    async fn update<F>(&self, change: F) -> ClientResult<()>
    where
        F: FnOnce(&mut Session),
    {
        let mut guard = self.session.write().await;
        let mut next = guard.clone();
        change(&mut next);
        self.store.save(&next).await?;
        *guard = next;
        Ok(())
    }

    // =========================================================================
    // Token
    // =========================================================================

    /// Stores a new token and works out when it expires.
    pub async fn save_token(&self, token: &str) -> ClientResult<()> {
        let expires_at = Claims::read(token)
            .and_then(|claims| claims.expires_at())
            .unwrap_or_else(|| Utc::now() + self.token_ttl);

        debug!(%expires_at, "Saving token");
        let token = token.to_string();
        self.update(move |s| {
            s.token = Some(token);
            s.expires_at = Some(expires_at);
        })
        .await
    }

    pub async fn token(&self) -> Option<String> {
        self.session.read().await.token.clone()
    }

    pub async fn expires_at(&self) -> Option<DateTime<Utc>> {
        self.session.read().await.expires_at
    }

    /// User id carried in the token, if it is a JWT that has one.
    pub async fn user_id(&self) -> Option<i64> {
        let token = self.token().await?;
        Claims::read(&token).and_then(|claims| claims.user_id())
    }

    /// A token is present and not expired.
    pub async fn is_token_valid(&self) -> bool {
        self.session.read().await.is_token_valid(Utc::now())
    }

    /// A valid token that expires within the refresh margin.
    pub async fn should_refresh_token(&self) -> bool {
        self.session
            .read()
            .await
            .expires_within(Utc::now(), self.refresh_margin)
    }

    // =========================================================================
    // User
    // =========================================================================

    pub async fn save_username(&self, username: &str) -> ClientResult<()> {
        let username = username.to_string();
        self.update(move |s| s.username = Some(username)).await
    }

    pub async fn username(&self) -> Option<String> {
        self.session.read().await.username.clone()
    }

    pub async fn save_user_role(&self, role: Role) -> ClientResult<()> {
        debug!(%role, "Saving role");
        self.update(move |s| s.role = Some(role)).await
    }

    pub async fn user_role(&self) -> Option<Role> {
        self.session.read().await.role
    }

    /// Copy of the whole session.
    pub async fn snapshot(&self) -> Session {
        self.session.read().await.clone()
    }

    // =========================================================================
    // Clearing
    // =========================================================================

    /// Removes token, expiry, username and role together.
    ///
    /// Memory is cleared even if the store fails, so this process stops
    /// sending the token either way.
    pub async fn clear(&self) -> ClientResult<()> {
        let mut guard = self.session.write().await;
        guard.clear();
        if let Err(e) = self.store.clear().await {
            warn!(error = %e, "Failed to clear persisted session");
            return Err(e);
        }
        debug!("Session cleared");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsonwebtoken::{EncodingKey, Header};
    use serde_json::json;

    fn jwt(claims: serde_json::Value) -> String {
        jsonwebtoken::encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(b"server-secret"),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn test_opaque_token_gets_default_ttl() {
        let tokens = TokenManager::in_memory();
        tokens.save_token("opaque-token").await.unwrap();

        assert!(tokens.is_token_valid().await);
        assert!(!tokens.should_refresh_token().await);
        assert_eq!(tokens.user_id().await, None);

        let expires_at = tokens.expires_at().await.unwrap();
        let ttl = expires_at - Utc::now();
        assert!(ttl > Duration::hours(23) && ttl <= Duration::hours(24));
    }

    #[tokio::test]
    async fn test_jwt_exp_is_used() {
        let tokens = TokenManager::in_memory();
        let exp = (Utc::now() + Duration::hours(2)).timestamp();
        tokens
            .save_token(&jwt(json!({ "exp": exp, "user_id": 42 })))
            .await
            .unwrap();

        assert_eq!(tokens.expires_at().await.unwrap().timestamp(), exp);
        assert_eq!(tokens.user_id().await, Some(42));
    }

    #[tokio::test]
    async fn test_expired_jwt_is_invalid() {
        let tokens = TokenManager::in_memory();
        let exp = (Utc::now() - Duration::minutes(1)).timestamp();
        tokens.save_token(&jwt(json!({ "exp": exp }))).await.unwrap();

        assert!(tokens.token().await.is_some());
        assert!(!tokens.is_token_valid().await);
        assert!(!tokens.should_refresh_token().await);
    }

    #[tokio::test]
    async fn test_should_refresh_near_expiry() {
        let tokens = TokenManager::in_memory();
        let exp = (Utc::now() + Duration::minutes(2)).timestamp();
        tokens.save_token(&jwt(json!({ "exp": exp }))).await.unwrap();

        assert!(tokens.is_token_valid().await);
        assert!(tokens.should_refresh_token().await);
    }

    #[test]
    fn test_user_id_claim_order() {
        let claims = Claims {
            id: Some(json!(7)),
            sub: Some(json!("9")),
            ..Default::default()
        };
        assert_eq!(claims.user_id(), Some(7));

        let claims = Claims {
            sub: Some(json!("9")),
            ..Default::default()
        };
        assert_eq!(claims.user_id(), Some(9));

        let claims = Claims {
            sub: Some(json!("ana")),
            ..Default::default()
        };
        assert_eq!(claims.user_id(), None);
    }

    #[tokio::test]
    async fn test_role_round_trip() {
        let tokens = TokenManager::in_memory();
        for role in [Role::Admin, Role::Customer] {
            tokens.save_user_role(role).await.unwrap();
            assert_eq!(tokens.user_role().await, Some(role));
        }
    }

    #[tokio::test]
    async fn test_writes_go_through_to_store() {
        let store = Arc::new(MemorySessionStore::new());
        let tokens = TokenManager::open(
            store.clone(),
            Duration::hours(1),
            Duration::minutes(5),
        )
        .await
        .unwrap();

        tokens.save_token("t1").await.unwrap();
        tokens.save_username("ana").await.unwrap();
        tokens.save_user_role(Role::Customer).await.unwrap();

        let persisted = store.persisted().await;
        assert_eq!(persisted.token.as_deref(), Some("t1"));
        assert_eq!(persisted.username.as_deref(), Some("ana"));
        assert_eq!(persisted.role, Some(Role::Customer));

        tokens.clear().await.unwrap();
        assert!(store.persisted().await.is_empty());
        assert!(tokens.snapshot().await.is_empty());
    }

    #[tokio::test]
    async fn test_open_restores_session() {
        let session = Session {
            token: Some("t1".to_string()),
            expires_at: Some(Utc::now() + Duration::hours(1)),
            username: Some("ana".to_string()),
            role: Some(Role::Admin),
        };
        let store = Arc::new(MemorySessionStore::with_session(session));

        let tokens = TokenManager::open(store, Duration::hours(1), Duration::minutes(5))
            .await
            .unwrap();
        assert!(tokens.is_token_valid().await);
        assert_eq!(tokens.username().await.as_deref(), Some("ana"));
        assert_eq!(tokens.user_role().await, Some(Role::Admin));
    }
}
