//! # Error Types
//!
//! Domain-specific error types for orderly-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  orderly-core errors (this file)                                       │
//! │  ├── CoreError        - Cart rules, parse failures                     │
//! │  └── ValidationError  - Input validation failures                      │
//! │                                                                         │
//! │  orderly-store errors                                                  │
//! │  └── StoreError       - Local SQLite failures                          │
//! │                                                                         │
//! │  orderly-client errors                                                 │
//! │  └── ClientError      - Transport and HTTP status failures             │
//! │                                                                         │
//! │  CLI errors                                                            │
//! │  └── CliError         - What the user sees (one line)                  │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError ─┐                                  │
//! │        StoreError ──────────────────┼──► CliError → stderr             │
//! │        ClientError ─────────────────┘                                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Core domain errors.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Product is not in the cart.
    #[error("Product {0} is not in the cart")]
    NotInCart(i64),

    /// Cart has exceeded maximum allowed lines.
    #[error("Cart cannot have more than {max} items")]
    CartTooLarge { max: usize },

    /// Line quantity exceeds maximum allowed.
    ///
    /// ## When This Occurs
    /// - Adding 5 of a product that already has 97 in the cart
    /// - Setting a line directly to 150
    #[error("Quantity {requested} exceeds maximum allowed ({max})")]
    QuantityTooLarge { requested: i64, max: i64 },

    /// A decimal amount could not be parsed.
    #[error("Invalid amount '{value}': {reason}")]
    InvalidAmount { value: String, reason: String },

    /// An order status name is not one of the known statuses.
    #[error("Unknown order status: '{0}'. Valid options: pending, processing, completed, cancelled")]
    UnknownStatus(String),

    /// A role name is not one of the known roles.
    #[error("Unknown role: '{0}'. Valid options: admin, customer")]
    UnknownRole(String),

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// These errors occur when user input doesn't meet requirements.
/// Used for early validation before a request is sent.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too short.
    #[error("{field} must be at least {min} characters")]
    TooShort { field: String, min: usize },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Invalid format (e.g., a price that is not a number).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================
