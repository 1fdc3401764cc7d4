//! # SQLite Session Store
//!
//! Backs the client's [`TokenManager`](orderly_client::TokenManager) with the
//! `session` table, so a login survives between runs.

use async_trait::async_trait;

use orderly_client::{ClientError, ClientResult, SessionStore};
use orderly_core::Session;
use orderly_store::{SessionRepository, StoreError};

#[derive(Debug, Clone)]
pub struct SqliteSessionStore {
    repo: SessionRepository,
}

impl SqliteSessionStore {
    pub fn new(repo: SessionRepository) -> Self {
        Self { repo }
    }
}

fn session_error(err: StoreError) -> ClientError {
    ClientError::Session(err.to_string())
}

#[async_trait]
impl SessionStore for SqliteSessionStore {
    async fn load(&self) -> ClientResult<Session> {
        self.repo.load().await.map_err(session_error)
    }

    async fn save(&self, session: &Session) -> ClientResult<()> {
        self.repo.save(session).await.map_err(session_error)
    }

    async fn clear(&self) -> ClientResult<()> {
        self.repo.clear().await.map_err(session_error)
    }
}
