use crate::error::ShelfError;
use serde::{Deserialize, Serialize};
use std::env;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Public volumes search endpoint used when the config does not override it.
pub const DEFAULT_ENDPOINT: &str = "https://www.googleapis.com/books/v1/volumes";

/// Upper bound the volumes API accepts for `maxResults`.
pub const MAX_RESULTS_LIMIT: u32 = 40;

/// Environment variable overriding the config file location.
pub const CONFIG_ENV: &str = "SHELF_CONFIG";

/// Environment variable overriding the catalog database location.
pub const DB_ENV: &str = "SHELF_DB";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ShelfConfig {
    #[serde(default)]
    pub output: Option<String>,
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub storage: StorageConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    #[serde(default = "default_max_results")]
    pub max_results: u32,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default)]
    pub api_key: Option<String>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            max_results: default_max_results(),
            timeout_secs: default_timeout_secs(),
            api_key: None,
        }
    }
}

impl ApiConfig {
    /// `max_results` clamped to what the API accepts.
    #[must_use]
    pub fn effective_max_results(&self) -> u32 {
        self.max_results.clamp(1, MAX_RESULTS_LIMIT)
    }

    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StorageConfig {
    #[serde(default)]
    pub db_path: Option<PathBuf>,
}

/// Location of the config file: `$SHELF_CONFIG`, else
/// `<config_dir>/shelf/config.toml`.
#[must_use]
pub fn config_path() -> Option<PathBuf> {
    if let Ok(path) = env::var(CONFIG_ENV) {
        if !path.trim().is_empty() {
            return Some(PathBuf::from(path));
        }
    }
    dirs::config_dir().map(|dir| dir.join("shelf/config.toml"))
}

/// Load the config file if present; a missing file yields defaults.
///
/// # Errors
///
/// Returns [`ShelfError::Config`] if the file exists but cannot be read or
/// parsed.
pub fn load_config() -> Result<ShelfConfig, ShelfError> {
    match config_path() {
        Some(path) => load_config_from(&path),
        None => Ok(ShelfConfig::default()),
    }
}

/// Load a config file from an explicit path.
///
/// # Errors
///
/// Returns [`ShelfError::Config`] if the file exists but cannot be read or
/// parsed.
pub fn load_config_from(path: &Path) -> Result<ShelfConfig, ShelfError> {
    if !path.exists() {
        tracing::debug!(path = %path.display(), "no config file, using defaults");
        return Ok(ShelfConfig::default());
    }

    let content = std::fs::read_to_string(path).map_err(|err| ShelfError::Config {
        path: path.to_path_buf(),
        message: err.to_string(),
    })?;

    toml::from_str::<ShelfConfig>(&content).map_err(|err| ShelfError::Config {
        path: path.to_path_buf(),
        message: err.to_string(),
    })
}

/// Directory holding the catalog database and the TUI log file.
#[must_use]
pub fn data_dir() -> PathBuf {
    dirs::data_dir().map_or_else(|| PathBuf::from(".shelf"), |dir| dir.join("shelf"))
}

#[must_use]
pub fn default_db_path() -> PathBuf {
    data_dir().join("shelf.db")
}

#[must_use]
pub fn log_path() -> PathBuf {
    data_dir().join("shelf.log")
}

/// Resolve the catalog path: `--db` flag, then `SHELF_DB`, then config,
/// then the platform data directory.
#[must_use]
pub fn resolve_db_path(flag: Option<&Path>, config: &ShelfConfig) -> PathBuf {
    let env_value = env::var(DB_ENV).ok();
    resolve_db_path_inner(flag, env_value.as_deref(), config.storage.db_path.as_deref())
}

fn resolve_db_path_inner(
    flag: Option<&Path>,
    env_value: Option<&str>,
    configured: Option<&Path>,
) -> PathBuf {
    if let Some(path) = flag {
        return path.to_path_buf();
    }
    if let Some(value) = env_value.filter(|v| !v.trim().is_empty()) {
        return PathBuf::from(value);
    }
    if let Some(path) = configured {
        return path.to_path_buf();
    }
    default_db_path()
}

fn default_endpoint() -> String {
    DEFAULT_ENDPOINT.to_string()
}

const fn default_max_results() -> u32 {
    20
}

const fn default_timeout_secs() -> u64 {
    10
}
