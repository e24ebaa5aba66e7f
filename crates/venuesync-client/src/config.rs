//! # Client Configuration
//!
//! Connection and sync settings for [`VenueApiClient`](crate::VenueApiClient)
//! and [`SyncEngine`](crate::SyncEngine).
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Environment Variables (highest priority)                           │
//! │     VENUESYNC_API_KEY=...                                              │
//! │     VENUESYNC_ORGANIZATION_ID=...                                      │
//! │                                                                         │
//! │  2. TOML Config File                                                   │
//! │     ~/.config/venuesync/config.toml (Linux)                            │
//! │     ~/Library/Application Support/io.venuesync.venuesync/... (macOS)   │
//! │                                                                         │
//! │  3. Default Values (lowest priority)                                   │
//! │     https://www.mapwize.io, 30s timeout, 10 concurrent requests        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! [api]
//! server_url = "https://www.mapwize.io"
//! api_key = "a1b2c3"
//! organization_id = "5a3b..."
//! timeout_secs = 30
//!
//! [sync]
//! concurrency = 10
//! ```

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;
use tracing::{debug, info, warn};
use venuesync_core::validation;
use venuesync_core::{DEFAULT_CONCURRENCY, DEFAULT_SERVER_URL};

use crate::error::{ApiError, ApiResult};

// =============================================================================
// API Settings
// =============================================================================

/// Where and as whom the client talks to the API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiSettings {
    /// Base URL of the API server, without the `/api/v1` suffix.
    #[serde(default = "default_server_url")]
    pub server_url: String,

    /// API key sent as the `api_key` query parameter.
    #[serde(default)]
    pub api_key: String,

    /// Organization sent as the `organizationId` query parameter.
    #[serde(default)]
    pub organization_id: String,

    /// Per-request timeout (seconds).
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

fn default_server_url() -> String {
    DEFAULT_SERVER_URL.to_string()
}

fn default_timeout() -> u64 {
    30
}

impl Default for ApiSettings {
    fn default() -> Self {
        ApiSettings {
            server_url: default_server_url(),
            api_key: String::new(),
            organization_id: String::new(),
            timeout_secs: default_timeout(),
        }
    }
}

// =============================================================================
// Sync Settings
// =============================================================================

/// Sync engine behavior settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncSettings {
    /// Maximum in-flight requests per sync phase.
    #[serde(default = "default_concurrency")]
    pub concurrency: usize,
}

fn default_concurrency() -> usize {
    DEFAULT_CONCURRENCY
}

impl Default for SyncSettings {
    fn default() -> Self {
        SyncSettings {
            concurrency: default_concurrency(),
        }
    }
}

// =============================================================================
// Main Client Configuration
// =============================================================================

/// Complete client configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientConfig {
    /// API connection settings.
    #[serde(default)]
    pub api: ApiSettings,

    /// Sync behavior settings.
    #[serde(default)]
    pub sync: SyncSettings,
}

impl ClientConfig {
    /// Creates a config with default settings and the given credentials.
    pub fn new(api_key: impl Into<String>, organization_id: impl Into<String>) -> Self {
        let mut config = Self::default();
        config.api.api_key = api_key.into();
        config.api.organization_id = organization_id.into();
        config
    }

    /// Builder-style server URL override.
    pub fn with_server_url(mut self, server_url: impl Into<String>) -> Self {
        self.api.server_url = server_url.into();
        self
    }

    /// Loads configuration from file, environment, and defaults.
    ///
    /// ## Load Order (later overrides earlier)
    /// 1. Default values
    /// 2. Config file (config.toml)
    /// 3. Environment variables
    pub fn load(config_path: Option<PathBuf>) -> ApiResult<Self> {
        let mut config = Self::default();

        if let Some(path) = config_path.or_else(Self::default_config_path) {
            if path.exists() {
                info!(?path, "Loading client config from file");
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
    pub fn save(&self, config_path: Option<PathBuf>) -> ApiResult<()> {
        let path = config_path
            .or_else(Self::default_config_path)
            .ok_or_else(|| ApiError::ConfigSaveFailed("No config path available".into()))?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| ApiError::ConfigSaveFailed(e.to_string()))?;
        }

        let contents = toml::to_string_pretty(self)?;
        std::fs::write(&path, contents).map_err(|e| ApiError::ConfigSaveFailed(e.to_string()))?;

        info!(?path, "Client config saved");
        Ok(())
    }

    /// Validates the configuration.
    pub fn validate(&self) -> ApiResult<()> {
        if validation::validate_api_key(&self.api.api_key).is_err() {
            return Err(ApiError::MissingApiKey);
        }

        if validation::validate_organization_id(&self.api.organization_id).is_err() {
            return Err(ApiError::MissingOrganizationId);
        }

        validation::validate_server_url(&self.api.server_url)
            .map_err(|e| ApiError::InvalidUrl(e.to_string()))?;
        url::Url::parse(&self.api.server_url)?;

        if self.api.timeout_secs == 0 {
            return Err(ApiError::InvalidConfig(
                "timeout_secs must be greater than 0".into(),
            ));
        }

        validation::validate_concurrency(self.sync.concurrency)?;

        Ok(())
    }

    /// Applies environment variable overrides.
    fn apply_env_overrides(&mut self) {
        self.apply_overrides_from(|key| std::env::var(key).ok());
    }

    fn apply_overrides_from(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(url) = lookup("VENUESYNC_SERVER_URL") {
            debug!(url = %url, "Overriding server URL from environment");
            self.api.server_url = url;
        }

        if let Some(key) = lookup("VENUESYNC_API_KEY") {
            self.api.api_key = key;
        }

        if let Some(id) = lookup("VENUESYNC_ORGANIZATION_ID") {
            debug!(organization_id = %id, "Overriding organization from environment");
            self.api.organization_id = id;
        }

        if let Some(timeout) = lookup("VENUESYNC_TIMEOUT_SECS") {
            match timeout.parse::<u64>() {
                Ok(t) => self.api.timeout_secs = t,
                Err(_) => warn!(value = %timeout, "Ignoring invalid VENUESYNC_TIMEOUT_SECS"),
            }
        }

        if let Some(concurrency) = lookup("VENUESYNC_CONCURRENCY") {
            match concurrency.parse::<usize>() {
                Ok(c) => self.sync.concurrency = c,
                Err(_) => warn!(value = %concurrency, "Ignoring invalid VENUESYNC_CONCURRENCY"),
            }
        }
    }

    /// Returns the default config file path.
    pub fn default_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("io", "venuesync", "venuesync")
            .map(|dirs| dirs.config_dir().join("config.toml"))
    }

    // =========================================================================
    // Convenience Methods
    // =========================================================================

    /// Returns the request timeout.
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.api.timeout_secs)
    }

    /// Returns the server URL.
    pub fn server_url(&self) -> &str {
        &self.api.server_url
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::collections::HashMap;

    #[test]
    fn test_default_config() {
        let config = ClientConfig::default();
        assert_eq!(config.api.server_url, "https://www.mapwize.io");
        assert_eq!(config.api.timeout_secs, 30);
        assert_eq!(config.sync.concurrency, 10);
    }

    #[test]
    fn test_config_validation() {
        let mut config = ClientConfig::default();
        assert!(matches!(config.validate(), Err(ApiError::MissingApiKey)));

        config.api.api_key = "key".into();
        assert!(matches!(config.validate(), Err(ApiError::MissingOrganizationId)));

        config.api.organization_id = "org".into();
        assert!(config.validate().is_ok());

        config.api.server_url = "ftp://example.com".into();
        assert!(matches!(config.validate(), Err(ApiError::InvalidUrl(_))));

        config.api.server_url = "http://localhost:3000".into();
        config.sync.concurrency = 0;
        assert!(config.validate().unwrap_err().is_config_error());
    }

    #[test]
    fn test_env_overrides() {
        let env: HashMap<&str, &str> = [
            ("VENUESYNC_API_KEY", "env-key"),
            ("VENUESYNC_CONCURRENCY", "4"),
            ("VENUESYNC_TIMEOUT_SECS", "not-a-number"),
        ]
        .into_iter()
        .collect();

        let mut config = ClientConfig::new("file-key", "org");
        config.apply_overrides_from(|key| env.get(key).map(|v| v.to_string()));

        assert_eq!(config.api.api_key, "env-key");
        assert_eq!(config.api.organization_id, "org");
        assert_eq!(config.sync.concurrency, 4);
        assert_eq!(config.api.timeout_secs, 30);
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config: ClientConfig = toml::from_str(
            r#"
            [api]
            api_key = "k"
            organization_id = "o"
            "#,
        )
        .unwrap();

        assert_eq!(config.api.server_url, DEFAULT_SERVER_URL);
        assert_eq!(config.sync, SyncSettings::default());
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let config = ClientConfig::new("key", "org").with_server_url("http://localhost:3000");
        config.save(Some(path.clone())).unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        assert!(contents.contains("[api]"));
        assert!(contents.contains("[sync]"));

        let loaded: ClientConfig = toml::from_str(&contents).unwrap();
        assert_eq!(loaded, config);
    }
}
