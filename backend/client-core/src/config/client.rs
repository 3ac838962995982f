use crate::error::config::ConfigError;

use common::ErrorLocation;

use std::env;
use std::path::{Path, PathBuf};
use std::time::Duration;

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use url::Url;

pub const CONFIG_FILE_NAME: &str = "client.toml";
pub const BASE_URL_ENV_VAR: &str = "CONSOLE_API_BASE_URL";

const CONFIG_VERSION: u32 = 1;
const MIN_TIMEOUT_MS: u64 = 100;
const MAX_TIMEOUT_MS: u64 = 300_000;

// ============================================
// CONFIG STRUCT
// ============================================

/// Settings for the HTTP access layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClientConfig {
    #[serde(default = "default_version")]
    pub version: u32,

    /// Prefix joined in front of every relative request url.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    /// Where the navigator is sent when the session expires.
    #[serde(default = "default_login_path")]
    pub login_path: String,

    /// Log every request and response at debug level.
    #[serde(default = "default_debug_requests")]
    pub debug_requests: bool,

    /// Prefix for keys written by the file credential store.
    #[serde(default = "default_storage_prefix")]
    pub storage_prefix: String,

    /// Directory downloads are saved into. `None` resolves to the user's download dir.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub download_dir: Option<PathBuf>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            version: CONFIG_VERSION,
            base_url: default_base_url(),
            timeout_ms: default_timeout_ms(),
            login_path: default_login_path(),
            debug_requests: default_debug_requests(),
            storage_prefix: default_storage_prefix(),
            download_dir: None,
        }
    }
}

// ============================================
// DEFAULT FUNCTIONS
// ============================================

fn default_version() -> u32 {
    CONFIG_VERSION
}
fn default_base_url() -> String {
    crate::DEFAULT_API_BASE_URL.to_string()
}
fn default_timeout_ms() -> u64 {
    10_000
}
fn default_login_path() -> String {
    crate::LOGIN_PATH.to_string()
}
fn default_debug_requests() -> bool {
    cfg!(debug_assertions)
}
fn default_storage_prefix() -> String {
    "app_".to_string()
}

// ============================================
// IMPLEMENTATION
// ============================================

impl ClientConfig {
    /// Load config from {config_dir}/client.toml.
    ///
    /// # Returns
    ///
    /// Returns `Ok(ClientConfig)` if loaded successfully or defaults if file missing.
    /// Returns `Err(ConfigError)` if file exists but is corrupted/invalid.
    pub fn load(config_dir: &Path) -> Result<Self, ConfigError> {
        let config_path = config_dir.join(CONFIG_FILE_NAME);

        if !config_path.exists() {
            info!(
                "Config file not found at {}, using defaults",
                config_path.display()
            );
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(&config_path).map_err(|e| {
            warn!("Failed to read client config: {}", e);
            ConfigError::ReadError {
                location: ErrorLocation::caller(),
                path: config_path.clone(),
                source: e,
            }
        })?;

        let config: ClientConfig = toml::from_str(&contents).map_err(|e| {
            warn!("Failed to parse client config: {}", e);
            ConfigError::ParseError {
                location: ErrorLocation::caller(),
                path: config_path.clone(),
                reason: e.to_string(),
            }
        })?;

        config.validate()?;

        info!("Client config loaded from {}", config_path.display());
        Ok(config)
    }

    /// Save config to {config_dir}/client.toml using temp file + rename.
    pub fn save(&self, config_dir: &Path) -> Result<(), ConfigError> {
        self.validate()?;

        std::fs::create_dir_all(config_dir).map_err(|e| ConfigError::WriteError {
            location: ErrorLocation::caller(),
            path: config_dir.to_path_buf(),
            source: e,
        })?;

        let config_path = config_dir.join(CONFIG_FILE_NAME);
        let temp_path = config_dir.join(format!("{}.tmp", CONFIG_FILE_NAME));

        let contents = toml::to_string_pretty(self).map_err(|e| ConfigError::SerializeError {
            location: ErrorLocation::caller(),
            reason: e.to_string(),
        })?;

        std::fs::write(&temp_path, contents).map_err(|e| ConfigError::WriteError {
            location: ErrorLocation::caller(),
            path: temp_path.clone(),
            source: e,
        })?;

        std::fs::rename(&temp_path, &config_path).map_err(|e| ConfigError::WriteError {
            location: ErrorLocation::caller(),
            path: config_path.clone(),
            source: e,
        })?;

        info!("Client config saved to {}", config_path.display());
        Ok(())
    }

    /// Apply `CONSOLE_API_BASE_URL` from the environment or a `.env` file in the cwd.
    pub fn with_env_overrides(mut self) -> Result<Self, ConfigError> {
        match dotenvy::dotenv() {
            Ok(path) => debug!("Loaded .env from: {:?}", path),
            Err(e) if e.not_found() => debug!("No .env file found"),
            Err(e) => warn!("Failed to parse .env: {}", e),
        }

        if let Ok(base_url) = env::var(BASE_URL_ENV_VAR) {
            info!("Using API base url from {}", BASE_URL_ENV_VAR);
            self.base_url = base_url;
        }

        self.validate()?;
        Ok(self)
    }

    /// Validate config values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.version == 0 || self.version > CONFIG_VERSION {
            return Err(ConfigError::validation(format!(
                "Invalid version: {} (expected 1-{})",
                self.version, CONFIG_VERSION
            )));
        }

        let base_url = Url::parse(&self.base_url).map_err(|e| {
            ConfigError::validation(format!("Invalid base_url '{}': {}", self.base_url, e))
        })?;
        if !matches!(base_url.scheme(), "http" | "https") {
            return Err(ConfigError::validation(format!(
                "base_url must be http or https: {}",
                self.base_url
            )));
        }

        if !(MIN_TIMEOUT_MS..=MAX_TIMEOUT_MS).contains(&self.timeout_ms) {
            return Err(ConfigError::validation(format!(
                "Invalid timeout_ms: {} (must be {}-{})",
                self.timeout_ms, MIN_TIMEOUT_MS, MAX_TIMEOUT_MS
            )));
        }

        if !self.login_path.starts_with('/') {
            return Err(ConfigError::validation(format!(
                "login_path must be absolute: {}",
                self.login_path
            )));
        }

        Ok(())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Configured download dir, else the platform download dir, else the cwd.
    pub fn resolve_download_dir(&self) -> PathBuf {
        self.download_dir
            .clone()
            .or_else(dirs::download_dir)
            .unwrap_or_else(|| PathBuf::from("."))
    }
}
