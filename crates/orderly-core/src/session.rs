//! # Session Record
//!
//! The one piece of client state that outlives a command: who is signed in,
//! with what token, until when.
//!
//! ```text
//! ┌──────────────────────────── Session ────────────────────────────┐
//! │  token       "eyJhbGciOi…"        (never logged)               │
//! │  expires_at  2024-05-02T10:30:00Z                              │
//! │  username    "ana"                                              │
//! │  role        Admin                                              │
//! └─────────────────────────────────────────────────────────────────┘
//!
//!   login / register ──► token + username + role written
//!   refresh          ──► token (+ role) replaced
//!   logout / 401     ──► everything cleared together
//! ```
//!
//! Time is always passed in, so every rule here is a pure function.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::types::Role;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub token: Option<String>,
    pub expires_at: Option<DateTime<Utc>>,
    pub username: Option<String>,
    pub role: Option<Role>,
}

impl Session {
    /// A token is present and has not expired.
    ///
    /// A token without a recorded expiry is treated as expired.
    pub fn is_token_valid(&self, now: DateTime<Utc>) -> bool {
        match (&self.token, self.expires_at) {
            (Some(token), Some(expires_at)) => !token.is_empty() && now < expires_at,
            _ => false,
        }
    }

    pub fn has_username(&self) -> bool {
        self.username.as_deref().is_some_and(|u| !u.trim().is_empty())
    }

    /// Valid token AND non-empty username.
    pub fn is_fully_authenticated(&self, now: DateTime<Utc>) -> bool {
        self.is_token_valid(now) && self.has_username()
    }

    /// Valid token that expires within `margin` of `now`.
    pub fn expires_within(&self, now: DateTime<Utc>, margin: Duration) -> bool {
        match self.expires_at {
            Some(expires_at) if self.is_token_valid(now) => expires_at - now <= margin,
            _ => false,
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == Session::default()
    }

    pub fn clear(&mut self) {
        *self = Session::default();
    }
}
