//! # CLI Error Type
//!
//! Every command returns `CliResult<T>`. Whatever went wrong, the user sees
//! one line on stderr and the process exits with status 1.
//!
//! ## Error Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  Command Function ── Result<T, CliError>                               │
//! │         │                                                               │
//! │         ├── ClientError::Unauthorized ──► NotLoggedIn  "Unauthorized…" │
//! │         ├── ClientError::Forbidden    ──► Forbidden                    │
//! │         ├── ClientError::Transport    ──► Network                      │
//! │         ├── CoreError / Validation    ──► Validation                   │
//! │         ├── StoreError                ──► Storage                      │
//! │         └── guards                    ──► "Please log in first"        │
//! │                                            "Admin access required"     │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  main: eprintln!("{message}") ; exit 1                                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;

use orderly_client::ClientError;
use orderly_core::{CoreError, ValidationError};
use orderly_store::StoreError;

pub type CliResult<T> = Result<T, CliError>;

/// Error shown to the user.
#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct CliError {
    /// Category, for logs and tests
    pub code: ErrorCode,

    /// The line printed to the user
    pub message: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    /// No valid session, or the backend rejected the token
    NotLoggedIn,

    /// Signed in, but the role does not allow it
    Forbidden,

    NotFound,

    /// Input refused locally or by the backend
    Validation,

    /// Backend unreachable or timed out
    Network,

    /// Backend failed (5xx) or sent something unreadable
    Server,

    /// Local database or config problem
    Storage,

    /// Some cart lines could not be ordered
    PartialCheckout,
}

impl CliError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        CliError {
            code,
            message: message.into(),
        }
    }

    pub fn not_logged_in() -> Self {
        CliError::new(ErrorCode::NotLoggedIn, "Please log in first")
    }

    pub fn admin_required() -> Self {
        CliError::new(ErrorCode::Forbidden, "Admin access required")
    }

    pub fn validation(message: impl Into<String>) -> Self {
        CliError::new(ErrorCode::Validation, message)
    }
}

impl From<ClientError> for CliError {
    fn from(err: ClientError) -> Self {
        let code = match &err {
            ClientError::Unauthorized(_) | ClientError::NotLoggedIn => ErrorCode::NotLoggedIn,
            ClientError::Forbidden(_) => ErrorCode::Forbidden,
            ClientError::NotFound(_) => ErrorCode::NotFound,
            ClientError::Rejected(_) | ClientError::Core(_) => ErrorCode::Validation,
            ClientError::Transport(_) => ErrorCode::Network,
            ClientError::Server { .. } | ClientError::Http { .. } | ClientError::Decode(_) => {
                ErrorCode::Server
            }
            ClientError::InvalidConfig(_)
            | ClientError::InvalidUrl(_)
            | ClientError::ConfigLoadFailed(_)
            | ClientError::ConfigSaveFailed(_)
            | ClientError::Session(_) => ErrorCode::Storage,
        };

        let message = match &err {
            ClientError::Unauthorized(_) => format!("{err}. Please log in again"),
            _ => err.to_string(),
        };
        CliError::new(code, message)
    }
}

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::NotInCart(_) => CliError::new(ErrorCode::NotFound, err.to_string()),
            CoreError::Validation(e) => CliError::validation(e.to_string()),
            other => CliError::validation(other.to_string()),
        }
    }
}

impl From<ValidationError> for CliError {
    fn from(err: ValidationError) -> Self {
        CliError::validation(err.to_string())
    }
}

impl From<StoreError> for CliError {
    fn from(err: StoreError) -> Self {
        tracing::error!(error = %err, "Local database error");
        CliError::new(ErrorCode::Storage, format!("Local storage error: {err}"))
    }
}
