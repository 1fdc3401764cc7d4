//! # orderly-core: Pure Domain Model for the Orderly Client
//!
//! This crate holds the types every other Orderly crate speaks: products,
//! orders, users and their roles, money, the shopping cart, and the session
//! record. It has zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Orderly Architecture                             │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    apps/cli (terminal front end)                │   │
//! │  │    login ──► products ──► cart ──► checkout ──► orders          │   │
//! │  └───────────────┬──────────────────────────────┬──────────────────┘   │
//! │                  │                              │                       │
//! │  ┌───────────────▼──────────────┐  ┌────────────▼─────────────────┐   │
//! │  │  orderly-client              │  │  orderly-store               │   │
//! │  │  REST, token store, roles    │  │  SQLite session + cart       │   │
//! │  └───────────────┬──────────────┘  └────────────┬─────────────────┘   │
//! │                  │                              │                       │
//! │  ┌───────────────▼──────────────────────────────▼─────────────────┐   │
//! │  │               ★ orderly-core (THIS CRATE) ★                    │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   types   │  │   money   │  │   cart    │  │ validation│  │   │
//! │  │   │  Product  │  │   Money   │  │   Cart    │  │   rules   │  │   │
//! │  │   │  Order    │  │  "12.50"  │  │ CartItem  │  │  checks   │  │   │
//! │  │   │  User     │  │           │  │           │  │           │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Server-owned records and request bodies
//! - [`money`] - Money type with integer arithmetic (no floating point!)
//! - [`cart`] - Client-side shopping cart
//! - [`session`] - The persisted session record
//! - [`error`] - Domain error types
//! - [`validation`] - Input validation before any network call
//!
//! ## Example Usage
//!
//! ```rust
//! use orderly_core::money::Money;
//!
//! // Prices arrive from the backend as decimal strings
//! let price: Money = "12.50".parse().unwrap();
//! assert_eq!(price.cents(), 1250);
//!
//! // Line totals are exact integer arithmetic
//! assert_eq!((price * 3).to_string(), "$37.50");
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod cart;
pub mod error;
pub mod money;
pub mod session;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use cart::{Cart, CartItem, CartTotals};
pub use error::{CoreError, CoreResult, ValidationError};
pub use money::Money;
pub use session::Session;
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Maximum distinct lines allowed in a single cart.
pub const MAX_CART_ITEMS: usize = 50;

/// Maximum quantity of a single cart line.
///
/// ## Business Reason
/// Prevents accidental over-ordering (typing 100 instead of 10).
pub const MAX_ITEM_QUANTITY: i64 = 99;
