//! # Client Configuration
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Environment Variables (highest priority)                           │
//! │     ORDERLY_API_URL=https://food.example.com/                          │
//! │     ORDERLY_TIMEOUT_SECS=15                                            │
//! │     ORDERLY_DB_PATH=/tmp/orderly.db                                    │
//! │     ORDERLY_REGISTRATION_ROLE=probe                                    │
//! │                                                                         │
//! │  2. TOML Config File                                                   │
//! │     ~/.config/orderly/orderly.toml (Linux)                             │
//! │     ~/Library/Application Support/com.orderly.orderly/orderly.toml     │
//! │                                                                         │
//! │  3. Default Values (lowest priority)                                   │
//! │     http://localhost:8080/, 30 s timeout, 24 h token lifetime          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! [api]
//! base_url = "http://localhost:8080/"
//! timeout_secs = 30
//! connect_timeout_secs = 10
//! user_agent = "orderly/0.1"
//!
//! [session]
//! token_ttl_secs = 86400
//! refresh_margin_secs = 300
//! database_path = "/path/to/orderly.db"   # optional
//!
//! [auth]
//! registration_default_role = "admin"     # admin | customer | probe
//! ```

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;
use tracing::{debug, info, warn};
use url::Url;

use crate::error::{ClientError, ClientResult};
use orderly_core::Role;

const CONFIG_FILE_NAME: &str = "orderly.toml";
const DATABASE_FILE_NAME: &str = "orderly.db";

// =============================================================================
// Registration Role
// =============================================================================

/// What registration assumes when the backend sends no role at all.
///
/// ## Options
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │  ADMIN (Default)                                                       │
/// │  • Matches the historical client: the first account is the owner       │
/// │  • Logged at WARN every time it is applied                             │
/// │                                                                         │
/// │  CUSTOMER                                                              │
/// │  • Least privilege; an admin promotes the account later                │
/// │                                                                         │
/// │  PROBE                                                                 │
/// │  • Same chain as login: fetch by id, then the admin listing probe      │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RegistrationRole {
    #[default]
    Admin,
    Customer,
    Probe,
}

impl RegistrationRole {
    /// The fixed role this setting assigns, `None` for `Probe`.
    pub fn fixed_role(&self) -> Option<Role> {
        match self {
            RegistrationRole::Admin => Some(Role::Admin),
            RegistrationRole::Customer => Some(Role::Customer),
            RegistrationRole::Probe => None,
        }
    }
}

impl std::fmt::Display for RegistrationRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RegistrationRole::Admin => write!(f, "admin"),
            RegistrationRole::Customer => write!(f, "customer"),
            RegistrationRole::Probe => write!(f, "probe"),
        }
    }
}

impl std::str::FromStr for RegistrationRole {
    type Err = ClientError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "admin" => Ok(RegistrationRole::Admin),
            "customer" | "user" => Ok(RegistrationRole::Customer),
            "probe" => Ok(RegistrationRole::Probe),
            other => Err(ClientError::InvalidConfig(format!(
                "Unknown registration role: '{}'. Valid options: admin, customer, probe",
                other
            ))),
        }
    }
}

// =============================================================================
// API Settings
// =============================================================================

/// Where the backend lives and how long to wait for it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiSettings {
    /// Base URL; endpoint paths like `api/v1/products` are joined onto it.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Whole-request timeout (seconds).
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    /// Connect timeout (seconds).
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_secs: u64,

    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

fn default_base_url() -> String {
    "http://localhost:8080/".to_string()
}

fn default_timeout() -> u64 {
    30
}

fn default_connect_timeout() -> u64 {
    10
}

fn default_user_agent() -> String {
    format!("orderly/{}", env!("CARGO_PKG_VERSION"))
}

impl Default for ApiSettings {
    fn default() -> Self {
        ApiSettings {
            base_url: default_base_url(),
            timeout_secs: default_timeout(),
            connect_timeout_secs: default_connect_timeout(),
            user_agent: default_user_agent(),
        }
    }
}

impl ApiSettings {
    /// Parsed base URL, always ending in `/` so relative joins keep its path.
    pub fn base_url(&self) -> ClientResult<Url> {
        let mut raw = self.base_url.trim().to_string();
        if !raw.ends_with('/') {
            raw.push('/');
        }
        Ok(Url::parse(&raw)?)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }
}

// =============================================================================
// Session Settings
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionSettings {
    /// Lifetime assumed for tokens that carry no `exp` claim (seconds).
    #[serde(default = "default_token_ttl")]
    pub token_ttl_secs: u64,

    /// Refresh when the token expires within this window (seconds).
    #[serde(default = "default_refresh_margin")]
    pub refresh_margin_secs: u64,

    /// SQLite file; defaults to the platform data directory.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub database_path: Option<PathBuf>,
}

fn default_token_ttl() -> u64 {
    24 * 60 * 60
}

fn default_refresh_margin() -> u64 {
    5 * 60
}

impl Default for SessionSettings {
    fn default() -> Self {
        SessionSettings {
            token_ttl_secs: default_token_ttl(),
            refresh_margin_secs: default_refresh_margin(),
            database_path: None,
        }
    }
}

// =============================================================================
// Auth Settings
// =============================================================================

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AuthSettings {
    #[serde(default)]
    pub registration_default_role: RegistrationRole,
}

// =============================================================================
// Main Configuration
// =============================================================================

/// Complete client configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ClientConfig {
    #[serde(default)]
    pub api: ApiSettings,

    #[serde(default)]
    pub session: SessionSettings,

    #[serde(default)]
    pub auth: AuthSettings,
}

impl ClientConfig {
    /// Loads configuration from file, environment, and defaults.
    ///
    /// ## Load Order (later overrides earlier)
    /// 1. Default values
    /// 2. Config file (orderly.toml)
    /// 3. Environment variables
    pub fn load(config_path: Option<PathBuf>) -> ClientResult<Self> {
        let mut config = Self::default();

        if let Some(path) = config_path.or_else(Self::default_config_path) {
            if path.exists() {
                debug!(?path, "Loading config from file");
                let contents = std::fs::read_to_string(&path)?;
                config = toml::from_str(&contents)?;
            } else {
                debug!(?path, "Config file not found, using defaults");
            }
        }

        config.apply_env_overrides();
        config.validate()?;

        Ok(config)
    }

    /// Saves configuration to file.
    pub fn save(&self, config_path: Option<PathBuf>) -> ClientResult<()> {
        let path = config_path
            .or_else(Self::default_config_path)
            .ok_or_else(|| ClientError::ConfigSaveFailed("No config path available".into()))?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| ClientError::ConfigSaveFailed(e.to_string()))?;
        }

        let contents = toml::to_string_pretty(self)?;
        std::fs::write(&path, contents).map_err(|e| ClientError::ConfigSaveFailed(e.to_string()))?;

        info!(?path, "Config saved");
        Ok(())
    }

    /// Validates the configuration.
    pub fn validate(&self) -> ClientResult<()> {
        let url = self.api.base_url()?;
        if url.scheme() != "http" && url.scheme() != "https" {
            return Err(ClientError::InvalidUrl(format!(
                "API URL must start with http:// or https://, got: {}",
                self.api.base_url
            )));
        }
        if url.host_str().is_none() {
            return Err(ClientError::InvalidUrl(format!(
                "API URL has no host: {}",
                self.api.base_url
            )));
        }

        if self.api.timeout_secs == 0 {
            return Err(ClientError::InvalidConfig(
                "timeout_secs must be greater than 0".into(),
            ));
        }
        if self.api.connect_timeout_secs == 0 {
            return Err(ClientError::InvalidConfig(
                "connect_timeout_secs must be greater than 0".into(),
            ));
        }
        if self.session.token_ttl_secs == 0 {
            return Err(ClientError::InvalidConfig(
                "token_ttl_secs must be greater than 0".into(),
            ));
        }

        Ok(())
    }

    fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    /// Applies overrides from any key lookup (the process environment in
    /// production, a map in tests).
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup("ORDERLY_API_URL") {
            debug!(url = %url, "Overriding API URL from environment");
            self.api.base_url = url;
        }

        if let Some(timeout) = lookup("ORDERLY_TIMEOUT_SECS") {
            match timeout.parse::<u64>() {
                Ok(secs) => self.api.timeout_secs = secs,
                Err(_) => warn!(value = %timeout, "Ignoring non-numeric ORDERLY_TIMEOUT_SECS"),
            }
        }

        if let Some(path) = lookup("ORDERLY_DB_PATH") {
            debug!(path = %path, "Overriding database path from environment");
            self.session.database_path = Some(PathBuf::from(path));
        }

        if let Some(role) = lookup("ORDERLY_REGISTRATION_ROLE") {
            match role.parse() {
                Ok(parsed) => self.auth.registration_default_role = parsed,
                Err(_) => warn!(value = %role, "Unknown registration role in environment"),
            }
        }
    }

    /// Returns the default config file path.
    pub fn default_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("com", "orderly", "orderly")
            .map(|dirs| dirs.config_dir().join(CONFIG_FILE_NAME))
    }

    /// The SQLite file: configured path, else the platform data directory.
    pub fn database_path(&self) -> ClientResult<PathBuf> {
        if let Some(path) = &self.session.database_path {
            return Ok(path.clone());
        }
        directories::ProjectDirs::from("com", "orderly", "orderly")
            .map(|dirs| dirs.data_dir().join(DATABASE_FILE_NAME))
            .ok_or_else(|| {
                ClientError::InvalidConfig(
                    "No home directory; set session.database_path or ORDERLY_DB_PATH".into(),
                )
            })
    }

    pub fn token_ttl(&self) -> chrono::Duration {
        chrono::Duration::seconds(self.session.token_ttl_secs as i64)
    }

    pub fn refresh_margin(&self) -> chrono::Duration {
        chrono::Duration::seconds(self.session.refresh_margin_secs as i64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_default_config() {
        let config = ClientConfig::default();
        assert_eq!(config.api.base_url, "http://localhost:8080/");
        assert_eq!(config.api.timeout_secs, 30);
        assert_eq!(config.api.connect_timeout_secs, 10);
        assert_eq!(config.session.token_ttl_secs, 86_400);
        assert_eq!(config.session.refresh_margin_secs, 300);
        assert_eq!(
            config.auth.registration_default_role,
            RegistrationRole::Admin
        );
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_base_url_gets_trailing_slash() {
        let mut config = ClientConfig::default();
        config.api.base_url = "https://food.example.com/backend".to_string();

        let url = config.api.base_url().unwrap();
        assert_eq!(
            url.join("api/v1/products").unwrap().as_str(),
            "https://food.example.com/backend/api/v1/products"
        );
    }

    #[test]
    fn test_config_validation() {
        let mut config = ClientConfig::default();

        config.api.base_url = "ftp://example.com".to_string();
        assert!(config.validate().is_err());

        config.api.base_url = "not a url".to_string();
        assert!(config.validate().is_err());

        config.api.base_url = "https://example.com".to_string();
        assert!(config.validate().is_ok());

        config.api.timeout_secs = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_registration_role_parsing() {
        assert_eq!("admin".parse::<RegistrationRole>().unwrap(), RegistrationRole::Admin);
        assert_eq!("Customer".parse::<RegistrationRole>().unwrap(), RegistrationRole::Customer);
        assert_eq!("probe".parse::<RegistrationRole>().unwrap(), RegistrationRole::Probe);
        assert!("root".parse::<RegistrationRole>().is_err());

        assert_eq!(RegistrationRole::Admin.fixed_role(), Some(Role::Admin));
        assert_eq!(RegistrationRole::Probe.fixed_role(), None);
    }

    #[test]
    fn test_overrides() {
        let env: HashMap<&str, &str> = [
            ("ORDERLY_API_URL", "https://api.example.com/"),
            ("ORDERLY_TIMEOUT_SECS", "5"),
            ("ORDERLY_DB_PATH", "/tmp/o.db"),
            ("ORDERLY_REGISTRATION_ROLE", "probe"),
        ]
        .into_iter()
        .collect();

        let mut config = ClientConfig::default();
        config.apply_overrides(|key| env.get(key).map(|v| v.to_string()));

        assert_eq!(config.api.base_url, "https://api.example.com/");
        assert_eq!(config.api.timeout_secs, 5);
        assert_eq!(config.database_path().unwrap(), PathBuf::from("/tmp/o.db"));
        assert_eq!(
            config.auth.registration_default_role,
            RegistrationRole::Probe
        );
    }

    #[test]
    fn test_bad_override_is_ignored() {
        let mut config = ClientConfig::default();
        config.apply_overrides(|key| match key {
            "ORDERLY_TIMEOUT_SECS" => Some("soon".to_string()),
            _ => None,
        });
        assert_eq!(config.api.timeout_secs, 30);
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("orderly.toml");
        std::fs::write(
            &path,
            r#"
            [api]
            base_url = "https://kitchen.example.com/"
            timeout_secs = 12

            [auth]
            registration_default_role = "customer"
            "#,
        )
        .unwrap();

        let config = ClientConfig::load(Some(path)).unwrap();
        assert_eq!(config.api.timeout_secs, 12);
        assert_eq!(config.api.connect_timeout_secs, 10);
        assert_eq!(
            config.auth.registration_default_role,
            RegistrationRole::Customer
        );
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("orderly.toml");

        let mut config = ClientConfig::default();
        config.session.refresh_margin_secs = 60;
        config.save(Some(path.clone())).unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        assert!(contents.contains("[api]"));
        assert!(contents.contains("[session]"));

        let loaded: ClientConfig = toml::from_str(&contents).unwrap();
        assert_eq!(loaded.session.refresh_margin_secs, 60);
    }

    #[test]
    fn test_load_rejects_invalid_toml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("orderly.toml");
        std::fs::write(&path, "[api\nbase_url = ").unwrap();

        let err = ClientConfig::load(Some(path)).unwrap_err();
        assert!(err.is_config_error());
    }
}
