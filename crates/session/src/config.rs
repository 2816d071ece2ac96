//! Session configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Optional
//! - `MAINSTREET_API_URL` - Base URL of the store API (default:
//!   `http://localhost:8000`)
//! - `MAINSTREET_DATA_DIR` - Directory for locally persisted records
//!   (default: `.mainstreet`)

use std::path::PathBuf;

use thiserror::Error;
use url::Url;

const DEFAULT_API_URL: &str = "http://localhost:8000";
const DEFAULT_DATA_DIR: &str = ".mainstreet";

/// Configuration errors that can occur during loading.
///
/// Every variable has a default, so only malformed values fail.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Session layer configuration.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Base URL of the store API. Endpoint paths are joined onto this.
    pub api_base_url: Url,
    /// Directory holding the persisted profile and wishlist blobs.
    pub data_dir: PathBuf,
}

impl SessionConfig {
    /// Build a configuration directly, for dependency injection and tests.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if `api_base_url` is not a valid URL.
    pub fn new(api_base_url: &str, data_dir: impl Into<PathBuf>) -> Result<Self, ConfigError> {
        let api_base_url = Url::parse(api_base_url).map_err(|e| {
            ConfigError::InvalidEnvVar("MAINSTREET_API_URL".to_string(), e.to_string())
        })?;
        Ok(Self {
            api_base_url,
            data_dir: data_dir.into(),
        })
    }

    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is present but invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let api_base_url = get_env_or_default("MAINSTREET_API_URL", DEFAULT_API_URL);
        let data_dir = get_env_or_default("MAINSTREET_DATA_DIR", DEFAULT_DATA_DIR);
        Self::new(&api_base_url, data_dir)
    }
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}
