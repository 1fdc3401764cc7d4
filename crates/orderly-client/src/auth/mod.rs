//! # Auth Module
//!
//! Session establishment and role resolution.
//!
//! - [`AuthService`] - login, registration, refresh, logout, role queries
//! - [`RolePolicy`] - ordered strategies for working out the role

pub mod roles;
pub mod service;

pub use roles::{Resolution, RolePolicy, RoleStrategy};
pub use service::AuthService;
