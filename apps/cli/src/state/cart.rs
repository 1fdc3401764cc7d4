//! # Cart State
//!
//! The cart lives in SQLite between runs and in memory while a command runs.
//!
//! ## Cart Operations Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  cart add 3 2                                                           │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  update(|cart| cart.add_item(&product, 2))                              │
//! │       │                                                                 │
//! │       ├── change applied to a copy                                      │
//! │       ├── copy saved (one transaction)                                  │
//! │       └── copy becomes the cart                                         │
//! │                                                                         │
//! │  A rejected change (quantity > 99, cart full) touches neither.         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, info};

use crate::error::CliResult;
use orderly_core::{Cart, CoreResult};
use orderly_store::CartRepository;

#[derive(Debug, Clone)]
pub struct CartState {
    cart: Arc<Mutex<Cart>>,
    repo: CartRepository,
}

impl CartState {
    /// Loads the saved cart.
    pub async fn load(repo: CartRepository) -> CliResult<Self> {
        let cart = repo.load().await?;
        debug!(lines = cart.item_count(), "Cart restored");
        Ok(CartState {
            cart: Arc::new(Mutex::new(cart)),
            repo,
        })
    }

    /// Executes a function with read access to the cart.
    pub async fn with_cart<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&Cart) -> R,
    {
        let cart = self.cart.lock().await;
        f(&cart)
    }

    /// Applies `change` and persists the result.
    ///
    /// ## Usage
    /// ```rust,ignore
    /// cart_state.update(|cart| cart.add_item(&product, 1)).await?;
    /// ```
    pub async fn update<F, R>(&self, change: F) -> CliResult<R>
    where
        F: FnOnce(&mut Cart) -> CoreResult<R>,
    {
        let mut cart = self.cart.lock().await;
        let mut next = cart.clone();
        let result = change(&mut next)?;
        self.repo.save(&next).await?;
        *cart = next;
        Ok(result)
    }

    /// Hands the cart to `username`. Lines someone else built are dropped.
    pub async fn claim(&self, username: &str) -> CliResult<()> {
        let dropped = self.update(|cart| Ok(cart.claim(username))).await?;
        if dropped {
            info!("Dropped a cart built by another user");
        }
        Ok(())
    }

    /// Forgets the cart and its owner.
    pub async fn clear(&self) -> CliResult<()> {
        let mut cart = self.cart.lock().await;
        self.repo.clear().await?;
        *cart = Cart::new();
        Ok(())
    }
}
