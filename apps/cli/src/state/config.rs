//! # Configuration State
//!
//! Loaded once at startup, read-only afterwards.
//!
//! ## Configuration Sources (Priority Order)
//! 1. `--api-url` flag
//! 2. Environment variables (`ORDERLY_*`)
//! 3. Config file (`orderly.toml`)
//! 4. Defaults

use std::path::PathBuf;

use crate::error::CliResult;
use orderly_client::ClientConfig;

#[derive(Debug, Clone)]
pub struct ConfigState {
    pub client: ClientConfig,
    pub database_path: PathBuf,
}

impl ConfigState {
    pub fn load(config_path: Option<PathBuf>, api_url: Option<String>) -> CliResult<Self> {
        let mut client = ClientConfig::load(config_path)?;
        if let Some(url) = api_url {
            client.api.base_url = url;
            client.validate()?;
        }
        Self::from_client(client)
    }

    pub fn from_client(client: ClientConfig) -> CliResult<Self> {
        let database_path = client.database_path()?;
        Ok(ConfigState {
            client,
            database_path,
        })
    }
}
