//! # User Repository
//!
//! Account management. Everything except [`UserRepository::me`] and
//! [`UserRepository::get`] on one's own id is admin-only on the backend.
//!
//! [`UserRepository::all`] doubles as the role probe: a customer token gets
//! 403, an admin token gets the list.

use reqwest::Method;

use super::{expect_empty, expect_json};
use crate::error::ClientResult;
use crate::interceptor::AuthInterceptor;
use orderly_core::{CreateUserRequest, UpdateUserRequest, User};

#[derive(Debug, Clone)]
pub struct UserRepository {
    interceptor: AuthInterceptor,
}

impl UserRepository {
    pub fn new(interceptor: AuthInterceptor) -> Self {
        Self { interceptor }
    }

    pub async fn all(&self) -> ClientResult<Vec<User>> {
        let request = self.interceptor.request(Method::GET, "api/v1/users")?;
        expect_json(self.interceptor.send(request).await?).await
    }

    pub async fn get(&self, id: i64) -> ClientResult<User> {
        let request = self
            .interceptor
            .request(Method::GET, &format!("api/v1/users/{id}"))?;
        expect_json(self.interceptor.send(request).await?).await
    }

    pub async fn create(&self, user: &CreateUserRequest) -> ClientResult<User> {
        let request = self
            .interceptor
            .request(Method::POST, "api/v1/users/create")?
            .json(user);
        expect_json(self.interceptor.send(request).await?).await
    }

    pub async fn update(&self, id: i64, changes: &UpdateUserRequest) -> ClientResult<User> {
        let request = self
            .interceptor
            .request(Method::PUT, &format!("api/v1/users/{id}"))?
            .json(changes);
        expect_json(self.interceptor.send(request).await?).await
    }

    pub async fn delete(&self, id: i64) -> ClientResult<()> {
        let request = self
            .interceptor
            .request(Method::DELETE, &format!("api/v1/users/{id}"))?;
        expect_empty(self.interceptor.send(request).await?).await
    }

    /// The account behind the current token.
    pub async fn me(&self) -> ClientResult<User> {
        let request = self.interceptor.request(Method::GET, "api/v1/user/me")?;
        expect_json(self.interceptor.send(request).await?).await
    }
}
