//! # Auth Repository
//!
//! The three unauthenticated-or-session calls: register, login, refresh.
//! These only talk to the backend; saving the session is
//! [`AuthService`](crate::auth::AuthService)'s job.

use reqwest::Method;
use tracing::debug;

use super::expect_json;
use crate::error::ClientResult;
use crate::interceptor::AuthInterceptor;
use orderly_core::{LoginRequest, LoginResponse, NewUser};

#[derive(Debug, Clone)]
pub struct AuthRepository {
    interceptor: AuthInterceptor,
}

impl AuthRepository {
    pub fn new(interceptor: AuthInterceptor) -> Self {
        Self { interceptor }
    }

    /// `POST api/v1/auth/register`
    pub async fn register(&self, user: &NewUser) -> ClientResult<LoginResponse> {
        debug!(username = %user.username, "Registering");
        let request = self
            .interceptor
            .request(Method::POST, "api/v1/auth/register")?
            .json(user);
        expect_json(self.interceptor.send(request).await?).await
    }

    /// `POST api/v1/auth/login`
    pub async fn login(&self, credentials: &LoginRequest) -> ClientResult<LoginResponse> {
        debug!(username = %credentials.username, "Logging in");
        let request = self
            .interceptor
            .request(Method::POST, "api/v1/auth/login")?
            .json(credentials);
        expect_json(self.interceptor.send(request).await?).await
    }

    /// `GET api/v1/auth/refresh`, authorized by the current token.
    pub async fn refresh(&self) -> ClientResult<LoginResponse> {
        let request = self
            .interceptor
            .request(Method::GET, "api/v1/auth/refresh")?;
        expect_json(self.interceptor.send(request).await?).await
    }
}
