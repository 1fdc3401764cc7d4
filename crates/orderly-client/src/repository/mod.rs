//! # Repository Module
//!
//! Typed access to the restaurant backend. One repository per resource,
//! all sharing one [`AuthInterceptor`].
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         OrderlyApi                                      │
//! │                                                                         │
//! │  api.products().list()                                                 │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ProductRepository ── GET api/v1/products ──► AuthInterceptor ──► HTTP │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  expect_json::<Vec<Product>>(response)                                 │
//! │       2xx  → decode body                                               │
//! │       else → ClientError::from_status(status, body)                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Repositories
//!
//! - [`AuthRepository`] - Register, login, token refresh
//! - [`ProductRepository`] - Menu listing and admin CRUD
//! - [`OrderRepository`] - Placing and tracking orders
//! - [`UserRepository`] - Accounts (mostly admin-only)

pub mod auth;
pub mod order;
pub mod product;
pub mod user;

pub use auth::AuthRepository;
pub use order::OrderRepository;
pub use product::ProductRepository;
pub use user::UserRepository;

use reqwest::Response;
use serde::de::DeserializeOwned;

use crate::config::ApiSettings;
use crate::error::{ClientError, ClientResult};
use crate::interceptor::AuthInterceptor;
use crate::token::TokenManager;

/// Entry point to every repository.
#[derive(Debug, Clone)]
pub struct OrderlyApi {
    interceptor: AuthInterceptor,
}

impl OrderlyApi {
    pub fn new(settings: &ApiSettings, tokens: TokenManager) -> ClientResult<Self> {
        Ok(Self {
            interceptor: AuthInterceptor::new(settings, tokens)?,
        })
    }

    pub fn from_interceptor(interceptor: AuthInterceptor) -> Self {
        Self { interceptor }
    }

    pub fn tokens(&self) -> &TokenManager {
        self.interceptor.tokens()
    }

    pub fn auth(&self) -> AuthRepository {
        AuthRepository::new(self.interceptor.clone())
    }

    pub fn products(&self) -> ProductRepository {
        ProductRepository::new(self.interceptor.clone())
    }

    pub fn orders(&self) -> OrderRepository {
        OrderRepository::new(self.interceptor.clone())
    }

    pub fn users(&self) -> UserRepository {
        UserRepository::new(self.interceptor.clone())
    }
}

// =============================================================================
// Response Handling
// =============================================================================

/// Turns a non-2xx response into the matching error.
async fn ensure_success(response: Response) -> ClientResult<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(ClientError::from_status(status, body))
}

/// Decodes a 2xx JSON body into `T`.
pub(crate) async fn expect_json<T: DeserializeOwned>(response: Response) -> ClientResult<T> {
    let response = ensure_success(response).await?;
    let body = response.text().await?;
    serde_json::from_str(&body).map_err(|e| ClientError::Decode(format!("{e}: {}", preview(&body))))
}

/// Accepts any 2xx, empty body included.
pub(crate) async fn expect_empty(response: Response) -> ClientResult<()> {
    ensure_success(response).await?;
    Ok(())
}

fn preview(body: &str) -> &str {
    match body.char_indices().nth(120) {
        Some((idx, _)) => &body[..idx],
        None => body,
    }
}
