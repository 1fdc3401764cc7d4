//! # State Module
//!
//! Everything a command needs, opened once per run.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    State Architecture                                   │
//! │                                                                         │
//! │  ┌──────────────┐  ┌──────────────┐  ┌──────────────────────────────┐  │
//! │  │ ConfigState  │  │  CartState   │  │  AuthService                 │  │
//! │  │              │  │              │  │  └─ OrderlyApi               │  │
//! │  │ ClientConfig │  │  Arc<Mutex<  │  │     └─ TokenManager          │  │
//! │  │ db path      │  │    Cart>>    │  │        └─ SqliteSessionStore │  │
//! │  └──────────────┘  └──────┬───────┘  └──────────────┬───────────────┘  │
//! │                           │                         │                   │
//! │                           └──────────┬──────────────┘                   │
//! │                                      ▼                                  │
//! │                              Database (orderly.db)                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

mod cart;
mod config;
mod session;

pub use cart::CartState;
pub use config::ConfigState;
pub use session::SqliteSessionStore;

use std::sync::Arc;
use tracing::debug;

use crate::error::CliResult;
use orderly_client::{AuthService, OrderlyApi, TokenManager};
use orderly_store::{Database, DbConfig};

pub struct AppState {
    pub config: ConfigState,
    pub db: Database,
    pub auth: AuthService,
    pub cart: CartState,
}

impl AppState {
    /// Opens the database, restores session and cart, wires the client.
    pub async fn open(config: ConfigState) -> CliResult<Self> {
        let db = Database::new(DbConfig::new(&config.database_path)).await?;
        debug!(path = %config.database_path.display(), "Local database ready");

        Self::with_database(config, db).await
    }

    /// Same as [`AppState::open`] over an already opened database.
    pub async fn with_database(config: ConfigState, db: Database) -> CliResult<Self> {
        let store = Arc::new(SqliteSessionStore::new(db.session()));
        let tokens = TokenManager::open(
            store,
            config.client.token_ttl(),
            config.client.refresh_margin(),
        )
        .await?;

        let api = OrderlyApi::new(&config.client.api, tokens)?;
        let auth = AuthService::new(api, &config.client.auth);
        auth.load_stored_user_info().await;

        let cart = CartState::load(db.cart()).await?;

        Ok(AppState {
            config,
            db,
            auth,
            cart,
        })
    }

    pub fn api(&self) -> &OrderlyApi {
        self.auth.api()
    }

    pub async fn close(&self) {
        self.db.close().await;
    }
}
