//! # orderly-client: REST Client and Session Rules
//!
//! Talks to the restaurant backend and keeps track of who is signed in.
//!
//! ## Module Structure
//! ```text
//! orderly-client/
//! ├── lib.rs          ← You are here (exports)
//! ├── config.rs       ← TOML config, env overrides, validation
//! ├── error.rs        ← ClientError, status mapping
//! ├── token.rs        ← TokenManager, SessionStore trait
//! ├── interceptor.rs  ← Bearer header, 401 → clear session
//! ├── repository/     ← auth, products, orders, users endpoints
//! └── auth/           ← AuthService, RolePolicy
//! ```
//!
//! ## Wiring
//! ```rust,ignore
//! let config = ClientConfig::load(None)?;
//! let tokens = TokenManager::open(store, config.token_ttl(), config.refresh_margin()).await?;
//! let api = OrderlyApi::new(&config.api, tokens)?;
//! let auth = AuthService::new(api.clone(), &config.auth);
//!
//! auth.login("ana", "secret").await?;
//! let menu = api.products().list().await?;
//! ```

pub mod auth;
pub mod config;
pub mod error;
pub mod interceptor;
pub mod repository;
pub mod token;

pub use auth::{AuthService, Resolution, RolePolicy, RoleStrategy};
pub use config::{ApiSettings, AuthSettings, ClientConfig, RegistrationRole, SessionSettings};
pub use error::{ClientError, ClientResult};
pub use interceptor::AuthInterceptor;
pub use repository::{
    AuthRepository, OrderRepository, OrderlyApi, ProductRepository, UserRepository,
};
pub use token::{MemorySessionStore, SessionStore, TokenManager};
