//! # Domain Types
//!
//! Records owned by the restaurant backend, plus the request bodies sent to it.
//!
//! ## Type Relationships
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Domain Type Relationships                        │
//! │                                                                         │
//! │  ┌──────────┐     places      ┌──────────┐     for       ┌──────────┐  │
//! │  │   User   │ ──────────────► │  Order   │ ────────────► │ Product  │  │
//! │  │          │   1         *   │          │   *        1  │          │  │
//! │  │ username │                 │ quantity │               │ name     │  │
//! │  │ role     │                 │ total    │               │ price    │  │
//! │  └────┬─────┘                 │ status   │               └──────────┘  │
//! │       │                       └──────────┘                             │
//! │       ▼                                                                │
//! │  ┌──────────┐   Wire shapes accepted for `role`:                       │
//! │  │   Role   │     "Admin"                                              │
//! │  │ Admin    │     { "role_id": 1, "name": "admin" }                    │
//! │  │ Customer │     "user"  (legacy name, means Customer)                │
//! │  └──────────┘                                                          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Field names follow the backend's snake_case JSON exactly, so these types
//! serialize without per-field renames.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

use crate::error::CoreError;
use crate::money::{self, Money};

// =============================================================================
// Role
// =============================================================================

/// What a signed-in user may do.
///
/// ## Role Permissions
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │  Permission              │ Customer │ Admin                             │
/// │  ─────────────────────── │ ──────── │ ─────                             │
/// │  Browse products         │    ✅    │  ✅                               │
/// │  Place orders            │    ✅    │  ✅                               │
/// │  See own orders          │    ✅    │  ✅                               │
/// │  Manage products         │    ❌    │  ✅                               │
/// │  See all orders          │    ❌    │  ✅                               │
/// │  Change order status     │    ❌    │  ✅                               │
/// │  Manage users            │    ❌    │  ✅                               │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    Admin,
    Customer,
}

impl Role {
    /// Resolves a backend role name, ignoring case.
    ///
    /// `"user"` is an older name for a customer account.
    pub fn from_name(name: &str) -> Option<Role> {
        match name.trim().to_ascii_lowercase().as_str() {
            "admin" => Some(Role::Admin),
            "customer" | "user" => Some(Role::Customer),
            _ => None,
        }
    }

    /// The canonical name the backend expects in request bodies.
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "Admin",
            Role::Customer => "Customer",
        }
    }

    pub fn is_admin(&self) -> bool {
        matches!(self, Role::Admin)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Role::from_name(s).ok_or_else(|| CoreError::UnknownRole(s.to_string()))
    }
}

impl Serialize for Role {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Role {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let name = String::deserialize(deserializer)?;
        name.parse().map_err(serde::de::Error::custom)
    }
}

/// The `role` field of a user as the backend actually sends it.
///
/// Older endpoints send a bare name, newer ones a role record. Either may
/// carry a name this client does not recognise, which is why resolution
/// returns an `Option`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RoleField {
    Name(String),
    Details {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        role_id: Option<i64>,
        name: String,
    },
}

impl RoleField {
    pub fn name(&self) -> &str {
        match self {
            RoleField::Name(name) => name,
            RoleField::Details { name, .. } => name,
        }
    }

    pub fn resolve(&self) -> Option<Role> {
        Role::from_name(self.name())
    }
}

impl From<Role> for RoleField {
    fn from(role: Role) -> Self {
        RoleField::Name(role.as_str().to_string())
    }
}

// =============================================================================
// User
// =============================================================================

/// A user account as seen by the client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    #[serde(default, alias = "id")]
    pub user_id: Option<i64>,

    /// Empty when the backend leaves it out (some login responses do).
    #[serde(default)]
    pub username: String,

    #[serde(default)]
    pub role: Option<RoleField>,

    #[serde(default, deserialize_with = "lenient_timestamp")]
    pub created_at: Option<DateTime<Utc>>,

    #[serde(default, deserialize_with = "lenient_timestamp")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl User {
    /// A local projection with only what the session remembers.
    pub fn local(username: impl Into<String>, role: Option<Role>) -> Self {
        Self {
            user_id: None,
            username: username.into(),
            role: role.map(RoleField::from),
            created_at: None,
            updated_at: None,
        }
    }

    /// The resolved role, if the backend sent one this client understands.
    pub fn role(&self) -> Option<Role> {
        self.role.as_ref().and_then(RoleField::resolve)
    }

    pub fn is_admin(&self) -> bool {
        self.role() == Some(Role::Admin)
    }

    pub fn is_customer(&self) -> bool {
        self.role() == Some(Role::Customer)
    }
}

// =============================================================================
// Product
// =============================================================================

/// A menu item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    #[serde(alias = "id")]
    pub product_id: i64,

    pub name: String,

    #[serde(default)]
    pub description: Option<String>,

    #[serde(with = "money::decimal_string")]
    pub price: Money,

    #[serde(default)]
    pub product_image_uri: Option<String>,
}

impl Product {
    /// Case-insensitive search over name and description.
    ///
    /// A blank query matches everything.
    pub fn matches(&self, query: &str) -> bool {
        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            return true;
        }
        self.name.to_lowercase().contains(&needle)
            || self
                .description
                .as_deref()
                .is_some_and(|d| d.to_lowercase().contains(&needle))
    }
}

// =============================================================================
// Order
// =============================================================================

/// Lifecycle of an order. Only an admin moves an order between states.
///
/// ```text
/// Pending ──► Processing ──► Completed
///    │             │
///    └─────────────┴───────► Cancelled
/// ```
///
/// `Unknown` stands for a status name the backend sent that none of the
/// above match. It is never parsed from user input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum OrderStatus {
    #[default]
    Pending,
    Processing,
    Completed,
    Cancelled,
    Unknown,
}

impl OrderStatus {
    pub const ALL: [OrderStatus; 4] = [
        OrderStatus::Pending,
        OrderStatus::Processing,
        OrderStatus::Completed,
        OrderStatus::Cancelled,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "Pending",
            OrderStatus::Processing => "Processing",
            OrderStatus::Completed => "Completed",
            OrderStatus::Cancelled => "Cancelled",
            OrderStatus::Unknown => "Unknown",
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrderStatus {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pending" => Ok(OrderStatus::Pending),
            "processing" => Ok(OrderStatus::Processing),
            "completed" => Ok(OrderStatus::Completed),
            "cancelled" | "canceled" => Ok(OrderStatus::Cancelled),
            _ => Err(CoreError::UnknownStatus(s.to_string())),
        }
    }
}

impl Serialize for OrderStatus {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for OrderStatus {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = Option::<String>::deserialize(deserializer)?;
        match raw {
            None => Ok(OrderStatus::Pending),
            // One odd row must not sink a whole listing.
            Some(name) => Ok(name.parse().unwrap_or(OrderStatus::Unknown)),
        }
    }
}

/// A single-product order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    #[serde(alias = "id")]
    pub order_id: i64,
    pub user_id: i64,
    pub product_id: i64,
    pub quantity: i64,

    #[serde(with = "money::decimal_string")]
    pub total_amount: Money,

    #[serde(default)]
    pub status: OrderStatus,

    #[serde(default, deserialize_with = "lenient_timestamp")]
    pub created_at: Option<DateTime<Utc>>,

    #[serde(default, deserialize_with = "lenient_timestamp")]
    pub updated_at: Option<DateTime<Utc>>,
}

// =============================================================================
// Request / Response Bodies
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Registration body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewUser {
    pub username: String,
    pub password: String,
}

/// Body returned by login, registration and refresh.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    pub token: String,

    #[serde(default)]
    pub message: Option<String>,

    #[serde(default)]
    pub user: Option<User>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateOrderRequest {
    pub product_id: i64,
    pub quantity: i64,
}

/// Admin-side account creation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateUserRequest {
    pub username: String,
    pub password: String,
    pub role: Role,
}

/// Admin-side account update. Absent fields are left unchanged.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateUserRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,
}

/// Body for creating or replacing a product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductInput {
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(with = "money::decimal_string")]
    pub price: Money,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product_image_uri: Option<String>,
}

impl From<&Product> for ProductInput {
    fn from(product: &Product) -> Self {
        Self {
            name: product.name.clone(),
            description: product.description.clone(),
            price: product.price,
            product_image_uri: product.product_image_uri.clone(),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct OrderStatusUpdate {
    pub status: OrderStatus,
}

// =============================================================================
// Timestamps
// =============================================================================

/// Accepts RFC 3339 or a naive `YYYY-MM-DDTHH:MM:SS[.f]` (taken as UTC).
///
/// Anything unparseable becomes `None` rather than failing the whole record.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .map(|naive| naive.and_utc())
}

fn lenient_timestamp<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw.as_deref().and_then(parse_timestamp))
}

// =============================================================================
// Unit Tests
// =============================================================================
