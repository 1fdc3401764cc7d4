//! # Client Error Types
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Client Error Categories                            │
//! │                                                                         │
//! │  ┌─────────────────┐  ┌─────────────────┐  ┌─────────────────────────┐ │
//! │  │  Configuration  │  │   Transport     │  │     HTTP status         │ │
//! │  │                 │  │                 │  │                         │ │
//! │  │  InvalidConfig  │  │  Transport      │  │  Unauthorized   (401)   │ │
//! │  │  InvalidUrl     │  │  Decode         │  │  Forbidden      (403)   │ │
//! │  │  ConfigLoad...  │  │                 │  │  NotFound       (404)   │ │
//! │  └─────────────────┘  └─────────────────┘  │  Rejected   (400/422)   │ │
//! │                                            │  Server         (5xx)   │ │
//! │  ┌─────────────────┐  ┌─────────────────┐  │  Http        (other)    │ │
//! │  │    Session      │  │     Input       │  └─────────────────────────┘ │
//! │  │                 │  │                 │                              │
//! │  │  Session        │  │  Core           │                              │
//! │  │  NotLoggedIn    │  │  (validation)   │                              │
//! │  └─────────────────┘  └─────────────────┘                              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! No call is retried automatically; the categories exist so the front end
//! can pick a message.

use reqwest::StatusCode;
use thiserror::Error;

use orderly_core::{CoreError, ValidationError};

/// Result type alias for client operations.
pub type ClientResult<T> = Result<T, ClientError>;

#[derive(Debug, Error)]
pub enum ClientError {
    // =========================================================================
    // Configuration Errors
    // =========================================================================
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("Failed to load config: {0}")]
    ConfigLoadFailed(String),

    #[error("Failed to save config: {0}")]
    ConfigSaveFailed(String),

    // =========================================================================
    // HTTP Status Errors
    // =========================================================================
    /// 401: the token is missing, expired, or was revoked.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// 403: signed in, but not allowed.
    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Not found: {0}")]
    NotFound(String),

    /// 400 or 422: the backend refused the input.
    #[error("Rejected: {0}")]
    Rejected(String),

    #[error("Server error ({status}): {message}")]
    Server { status: u16, message: String },

    #[error("HTTP {status}: {message}")]
    Http { status: u16, message: String },

    // =========================================================================
    // Transport Errors
    // =========================================================================
    /// The request never got a response (DNS, refused, timeout, TLS).
    #[error("Network error: {0}")]
    Transport(String),

    /// A 2xx response whose body did not match the expected shape.
    #[error("Unexpected response: {0}")]
    Decode(String),

    // =========================================================================
    // Session Errors
    // =========================================================================
    /// The session backend failed to read or write.
    #[error("Session storage error: {0}")]
    Session(String),

    #[error("Not logged in")]
    NotLoggedIn,

    // =========================================================================
    // Input Errors
    // =========================================================================
    #[error(transparent)]
    Core(#[from] CoreError),
}

impl ClientError {
    /// Maps a non-2xx status and its body to an error.
    ///
    /// ## Status Mapping
    /// ```text
    /// 401       → Unauthorized
    /// 403       → Forbidden
    /// 404       → NotFound
    /// 400, 422  → Rejected
    /// 5xx       → Server
    /// other     → Http
    /// ```
    pub fn from_status(status: StatusCode, body: String) -> Self {
        let message = error_message(status, body);
        match status.as_u16() {
            401 => ClientError::Unauthorized(message),
            403 => ClientError::Forbidden(message),
            404 => ClientError::NotFound(message),
            400 | 422 => ClientError::Rejected(message),
            code @ 500..=599 => ClientError::Server {
                status: code,
                message,
            },
            code => ClientError::Http {
                status: code,
                message,
            },
        }
    }

    /// The HTTP status this error came from, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Unauthorized(_) => Some(401),
            ClientError::Forbidden(_) => Some(403),
            ClientError::NotFound(_) => Some(404),
            ClientError::Server { status, .. } | ClientError::Http { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Signing in again would fix it.
    pub fn is_auth_error(&self) -> bool {
        matches!(self, ClientError::Unauthorized(_) | ClientError::NotLoggedIn)
    }

    /// Trying the same call later might succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            ClientError::Transport(_) | ClientError::Server { .. }
        )
    }

    pub fn is_config_error(&self) -> bool {
        matches!(
            self,
            ClientError::InvalidConfig(_)
                | ClientError::InvalidUrl(_)
                | ClientError::ConfigLoadFailed(_)
                | ClientError::ConfigSaveFailed(_)
        )
    }
}

/// Prefers the backend's `message`/`error` field, then the raw body, then
/// the status reason.
fn error_message(status: StatusCode, body: String) -> String {
    let body = body.trim();
    if let Ok(json) = serde_json::from_str::<serde_json::Value>(body) {
        for key in ["message", "error", "detail"] {
            if let Some(text) = json.get(key).and_then(|v| v.as_str()) {
                return text.to_string();
            }
        }
    }
    if body.is_empty() {
        status
            .canonical_reason()
            .unwrap_or("no response body")
            .to_string()
    } else {
        body.to_string()
    }
}

// =============================================================================
// Error Conversions
// =============================================================================

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            ClientError::Decode(err.to_string())
        } else if let Some(status) = err.status() {
            ClientError::from_status(status, String::new())
        } else {
            ClientError::Transport(err.to_string())
        }
    }
}

impl From<serde_json::Error> for ClientError {
    fn from(err: serde_json::Error) -> Self {
        ClientError::Decode(err.to_string())
    }
}

impl From<ValidationError> for ClientError {
    fn from(err: ValidationError) -> Self {
        ClientError::Core(CoreError::Validation(err))
    }
}

impl From<url::ParseError> for ClientError {
    fn from(err: url::ParseError) -> Self {
        ClientError::InvalidUrl(err.to_string())
    }
}

impl From<std::io::Error> for ClientError {
    fn from(err: std::io::Error) -> Self {
        ClientError::ConfigLoadFailed(err.to_string())
    }
}

impl From<toml::de::Error> for ClientError {
    fn from(err: toml::de::Error) -> Self {
        ClientError::ConfigLoadFailed(err.to_string())
    }
}

impl From<toml::ser::Error> for ClientError {
    fn from(err: toml::ser::Error) -> Self {
        ClientError::ConfigSaveFailed(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_status() {
        assert!(matches!(
            ClientError::from_status(StatusCode::UNAUTHORIZED, String::new()),
            ClientError::Unauthorized(_)
        ));
        assert!(matches!(
            ClientError::from_status(StatusCode::FORBIDDEN, String::new()),
            ClientError::Forbidden(_)
        ));
        assert!(matches!(
            ClientError::from_status(StatusCode::NOT_FOUND, String::new()),
            ClientError::NotFound(_)
        ));
        assert!(matches!(
            ClientError::from_status(StatusCode::BAD_REQUEST, String::new()),
            ClientError::Rejected(_)
        ));
        assert!(matches!(
            ClientError::from_status(StatusCode::UNPROCESSABLE_ENTITY, String::new()),
            ClientError::Rejected(_)
        ));
        assert!(matches!(
            ClientError::from_status(StatusCode::BAD_GATEWAY, String::new()),
            ClientError::Server { status: 502, .. }
        ));
        assert!(matches!(
            ClientError::from_status(StatusCode::CONFLICT, String::new()),
            ClientError::Http { status: 409, .. }
        ));
    }

    #[test]
    fn test_message_extraction() {
        let err = ClientError::from_status(
            StatusCode::BAD_REQUEST,
            r#"{"message": "Username already taken"}"#.to_string(),
        );
        assert_eq!(err.to_string(), "Rejected: Username already taken");

        let err = ClientError::from_status(StatusCode::NOT_FOUND, "no such product".to_string());
        assert_eq!(err.to_string(), "Not found: no such product");

        let err = ClientError::from_status(StatusCode::FORBIDDEN, String::new());
        assert_eq!(err.to_string(), "Forbidden: Forbidden");
    }

    #[test]
    fn test_categories() {
        assert!(ClientError::Unauthorized(String::new()).is_auth_error());
        assert!(ClientError::NotLoggedIn.is_auth_error());
        assert!(!ClientError::Forbidden(String::new()).is_auth_error());

        assert!(ClientError::Transport("refused".into()).is_retryable());
        assert!(!ClientError::Rejected("bad".into()).is_retryable());

        assert!(ClientError::InvalidUrl("x".into()).is_config_error());
        assert_eq!(ClientError::NotFound(String::new()).status(), Some(404));
    }
}
