//! Application configuration management.
//!
//! This module holds the base URL of the API gateway and the fixed endpoint
//! table. Configuration is stored at `~/.config/spendtrack/config.json`;
//! the `SPENDTRACK_BASE_URL` environment variable overrides the file.

use std::path::PathBuf;

use anyhow::Result;
use serde::{Deserialize, Serialize};

/// Application name used for the config directory path
const APP_NAME: &str = "spendtrack";

/// Config file name
const CONFIG_FILE: &str = "config.json";

/// Environment variable overriding the configured base URL
const BASE_URL_ENV: &str = "SPENDTRACK_BASE_URL";

/// Default gateway URL for local development.
/// Android emulators reach the host at `http://10.0.2.2:8000` instead.
pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";

/// Logical API operations and their paths under the versioned prefix.
///
/// The mapping is fixed; the gateway routes on these literal paths.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    Login,
    Signup,
    RefreshToken,
    Ping,
    GetExpenses,
    AddExpense,
    ProcessMessage,
}

impl Endpoint {
    pub fn path(self) -> &'static str {
        match self {
            Endpoint::Login => "/auth/v1/login",
            Endpoint::Signup => "/auth/v1/signup",
            Endpoint::RefreshToken => "/auth/v1/refreshToken",
            Endpoint::Ping => "/auth/v1/ping",
            Endpoint::GetExpenses => "/expense/v1/getExpense",
            Endpoint::AddExpense => "/expense/v1/addExpense",
            Endpoint::ProcessMessage => "/v1/ds/message",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    pub base_url: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }
}

impl ApiConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Load configuration, preferring the environment override, then the
    /// config file, then the built-in default.
    pub fn load() -> Result<Self> {
        if let Ok(url) = std::env::var(BASE_URL_ENV) {
            return Ok(Self::new(url));
        }

        let path = Self::config_path()?;
        if path.exists() {
            let contents = std::fs::read_to_string(&path)?;
            let config: Self = serde_json::from_str(&contents)?;
            Ok(Self::new(config.base_url))
        } else {
            Ok(Self::default())
        }
    }

    pub fn save(&self) -> Result<()> {
        let path = Self::config_path()?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let contents = serde_json::to_string_pretty(self)?;
        std::fs::write(path, contents)?;
        Ok(())
    }

    /// Full URL for a logical endpoint
    pub fn url(&self, endpoint: Endpoint) -> String {
        format!("{}{}", self.base_url, endpoint.path())
    }

    fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find config directory"))?;
        Ok(config_dir.join(APP_NAME).join(CONFIG_FILE))
    }
}
