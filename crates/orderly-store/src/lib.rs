//! # orderly-store: Local Persistence for Orderly
//!
//! The backend owns products, orders and accounts. This crate keeps only what
//! the client itself must remember between runs: the session and the cart.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Orderly Data Flow                                │
//! │                                                                         │
//! │  CLI command (cart add 7 2)                                            │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                  orderly-store (THIS CRATE)                     │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌───────────────┐    ┌──────────────┐  │   │
//! │  │   │   Database    │    │  Repositories │    │  Migrations  │  │   │
//! │  │   │   (pool.rs)   │    │               │    │  (embedded)  │  │   │
//! │  │   │               │    │ SessionRepo   │    │ 001_initial  │  │   │
//! │  │   │ SqlitePool    │◄───│ CartRepo      │    │ _schema.sql  │  │   │
//! │  │   └───────────────┘    └───────────────┘    └──────────────┘  │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │   ~/.local/share/orderly/orderly.db  (platform data dir)        │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use orderly_store::{Database, DbConfig};
//!
//! let db = Database::new(DbConfig::new("orderly.db")).await?;
//! let session = db.session().load().await?;
//! let cart = db.cart().load().await?;
//! ```

pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;

pub use error::{StoreError, StoreResult};
pub use pool::{Database, DbConfig};

pub use repository::cart::CartRepository;
pub use repository::session::SessionRepository;
