//! # Repository Module
//!
//! Repositories over the local SQLite file.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  db.session()                         db.cart()                         │
//! │  ├── load()  → Session                ├── load()  → Cart               │
//! │  ├── save(&Session)                   ├── save(&Cart)                  │
//! │  └── clear()                          └── clear()                      │
//! │       │                                    │                            │
//! │       ▼                                    ▼                            │
//! │  session (one row, id = 1)            cart_items (one row per product) │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Both repositories replace state wholesale: the caller holds the domain
//! value and hands it back after mutating it.
//!
//! ## Available Repositories
//!
//! - [`SessionRepository`](session::SessionRepository) - The signed-in session
//! - [`CartRepository`](cart::CartRepository) - The shopping cart

pub mod cart;
pub mod session;
