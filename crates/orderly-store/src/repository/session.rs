//! # Session Repository
//!
//! Persists the single [`Session`] row.

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::{StoreError, StoreResult};
use orderly_core::{Role, Session};

#[derive(Debug, sqlx::FromRow)]
struct SessionRow {
    token: Option<String>,
    expires_at: Option<DateTime<Utc>>,
    username: Option<String>,
    role: Option<String>,
}

impl TryFrom<SessionRow> for Session {
    type Error = StoreError;

    fn try_from(row: SessionRow) -> Result<Self, Self::Error> {
        let role = match row.role {
            Some(name) => Some(
                Role::from_name(&name)
                    .ok_or_else(|| StoreError::corrupt("session", format!("role '{name}'")))?,
            ),
            None => None,
        };

        Ok(Session {
            token: row.token,
            expires_at: row.expires_at,
            username: row.username,
            role,
        })
    }
}

/// Repository for the session row.
///
/// ## Usage
/// ```rust,ignore
/// let repo = db.session();
/// let mut session = repo.load().await?;
/// session.username = Some("ana".into());
/// repo.save(&session).await?;
/// ```
#[derive(Debug, Clone)]
pub struct SessionRepository {
    pool: SqlitePool,
}

impl SessionRepository {
    pub fn new(pool: SqlitePool) -> Self {
        SessionRepository { pool }
    }

    /// Loads the stored session, or an empty one if nobody has signed in.
    pub async fn load(&self) -> StoreResult<Session> {
        let row: Option<SessionRow> = sqlx::query_as(
            "SELECT token, expires_at, username, role FROM session WHERE id = 1",
        )
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some(row) => row.try_into(),
            None => Ok(Session::default()),
        }
    }

    /// Replaces the stored session. An empty session deletes the row.
    pub async fn save(&self, session: &Session) -> StoreResult<()> {
        if session.is_empty() {
            return self.clear().await;
        }

        debug!(
            has_token = session.token.is_some(),
            username = session.username.as_deref().unwrap_or(""),
            "Saving session"
        );

        sqlx::query(
            r#"
            INSERT INTO session (id, token, expires_at, username, role, updated_at)
            VALUES (1, ?1, ?2, ?3, ?4, ?5)
            ON CONFLICT(id) DO UPDATE SET
                token = excluded.token,
                expires_at = excluded.expires_at,
                username = excluded.username,
                role = excluded.role,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(session.token.as_deref())
        .bind(session.expires_at)
        .bind(session.username.as_deref())
        .bind(session.role.map(|r| r.as_str()))
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    pub async fn clear(&self) -> StoreResult<()> {
        debug!("Clearing session");
        sqlx::query("DELETE FROM session")
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};
    use chrono::Duration;

    async fn repo() -> SessionRepository {
        Database::new(DbConfig::in_memory()).await.unwrap().session()
    }

    fn signed_in() -> Session {
        Session {
            token: Some("t1".to_string()),
            expires_at: Some(Utc::now() + Duration::hours(1)),
            username: Some("ana".to_string()),
            role: Some(Role::Admin),
        }
    }

    #[tokio::test]
    async fn test_load_empty() {
        let repo = repo().await;
        assert!(repo.load().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_save_and_load() {
        let repo = repo().await;
        let session = signed_in();

        repo.save(&session).await.unwrap();
        let loaded = repo.load().await.unwrap();

        assert_eq!(loaded.token, session.token);
        assert_eq!(loaded.username, session.username);
        assert_eq!(loaded.role, Some(Role::Admin));
        assert_eq!(
            loaded.expires_at.map(|t| t.timestamp()),
            session.expires_at.map(|t| t.timestamp())
        );
    }

    #[tokio::test]
    async fn test_save_overwrites() {
        let repo = repo().await;
        repo.save(&signed_in()).await.unwrap();

        let mut session = signed_in();
        session.role = Some(Role::Customer);
        session.token = Some("t2".to_string());
        repo.save(&session).await.unwrap();

        let loaded = repo.load().await.unwrap();
        assert_eq!(loaded.token.as_deref(), Some("t2"));
        assert_eq!(loaded.role, Some(Role::Customer));
    }

    #[tokio::test]
    async fn test_clear() {
        let repo = repo().await;
        repo.save(&signed_in()).await.unwrap();

        repo.clear().await.unwrap();
        assert!(repo.load().await.unwrap().is_empty());

        repo.save(&signed_in()).await.unwrap();
        repo.save(&Session::default()).await.unwrap();
        assert!(repo.load().await.unwrap().is_empty());
    }
}
