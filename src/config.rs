//! Application configuration loaded from environment variables.
//!
//! The backend URL is optional: an engine started without one runs every
//! follow-graph operation against the local on-device mirror.

use std::env;
use std::path::PathBuf;

/// Engine configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the REST backend (e.g. `https://xyz.example.co`).
    /// `None` means the app runs without a remote backend.
    pub api_url: Option<String>,
    /// API key sent with every backend request.
    pub api_key: String,
    /// Directory for on-device persisted state (local follow list).
    pub data_dir: PathBuf,
}

impl Default for Config {
    /// Default config for testing only.
    fn default() -> Self {
        Self {
            api_url: None,
            api_key: "test_api_key".to_string(),
            data_dir: std::env::temp_dir(),
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// `FORKFUL_API_URL` is optional; leaving it unset puts the follow graph
    /// in local fallback mode from the start.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok(); // Load .env file if present

        Ok(Self {
            api_url: env::var("FORKFUL_API_URL")
                .ok()
                .map(|v| v.trim_end_matches('/').to_string())
                .filter(|v| !v.is_empty()),
            api_key: env::var("FORKFUL_API_KEY")
                .map(|v| v.trim().to_string())
                .map_err(|_| ConfigError::Missing("FORKFUL_API_KEY"))?,
            data_dir: env::var("FORKFUL_DATA_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from(".forkful")),
        })
    }

    /// Whether a remote backend is configured at all.
    pub fn backend_configured(&self) -> bool {
        self.api_url.is_some()
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),
}

#[cfg(test)]
mod tests {
    use super::*;

    // Single test because env vars are process-global and tests run in parallel
    #[test]
    fn test_config_from_env() {
        env::set_var("FORKFUL_API_KEY", "test_key");
        env::set_var("FORKFUL_API_URL", "https://api.forkful.test/");

        let config = Config::from_env().expect("Config should load");

        assert_eq!(config.api_key, "test_key");
        // Trailing slash is stripped so URL joining stays uniform
        assert_eq!(config.api_url.as_deref(), Some("https://api.forkful.test"));
        assert!(config.backend_configured());

        env::remove_var("FORKFUL_API_URL");
        let config = Config::from_env().expect("Config should load");
        assert!(!config.backend_configured());
    }
}
