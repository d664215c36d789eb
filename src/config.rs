//! Configuration for the dadam client

use crate::error::{DadamError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{info, warn};

/// Environment variable overriding [`ClientConfig::api_base_url`]
pub const ENV_API_BASE_URL: &str = "DADAM_API_BASE_URL";

/// Environment variable overriding [`ClientConfig::timeout_secs`]
pub const ENV_TIMEOUT_SECS: &str = "DADAM_TIMEOUT_SECS";

/// Client configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Base URL of the backend API, without trailing slash
    pub api_base_url: String,

    /// Request timeout in seconds
    pub timeout_secs: u64,

    /// Maximum number of notifications kept in the store
    pub notification_cap: usize,

    /// Maximum characters in a top-level answer
    pub answer_max_chars: usize,

    /// Upload limit for profile images in bytes
    pub profile_image_max_bytes: usize,

    /// Keys of the persisted documents
    pub storage_keys: StorageKeys,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_base_url: "http://localhost:8080/api/v1".to_string(),
            timeout_secs: 10,
            notification_cap: 50,
            answer_max_chars: 100,
            profile_image_max_bytes: 5 * 1024 * 1024,
            storage_keys: StorageKeys::default(),
        }
    }
}

/// Keys of the independent documents kept in the key-value store
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageKeys {
    pub profiles: String,
    pub quiz_selections: String,
    pub balance_selections: String,
    pub notifications: String,
    pub answers: String,
    pub session: String,
}

impl Default for StorageKeys {
    fn default() -> Self {
        Self {
            profiles: "dadam_profiles_v1".to_string(),
            quiz_selections: "dadam_quiz_selections_v1".to_string(),
            balance_selections: "dadam_balance_selections_v1".to_string(),
            notifications: "dadam_notifications_v1".to_string(),
            answers: "dadam_answers_v1".to_string(),
            session: "dadam_session_v1".to_string(),
        }
    }
}

impl ClientConfig {
    /// Parse a TOML document; missing fields keep their defaults
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: ClientConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from a TOML file, falling back to defaults when it does not exist
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            info!("Config file {} not found, using defaults", path.display());
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Apply `DADAM_*` environment overrides
    pub fn with_env_overrides(self) -> Self {
        self.with_overrides(|key| std::env::var(key).ok())
    }

    fn with_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(url) = lookup(ENV_API_BASE_URL) {
            info!("{ENV_API_BASE_URL} set, using {url}");
            self.api_base_url = url;
        }
        if let Some(raw) = lookup(ENV_TIMEOUT_SECS) {
            match raw.parse() {
                Ok(secs) => self.timeout_secs = secs,
                Err(e) => warn!("Invalid {ENV_TIMEOUT_SECS} value {raw:?}: {e}"),
            }
        }
        self
    }

    /// API base URL with any trailing slash removed
    pub fn api_base(&self) -> &str {
        self.api_base_url.trim_end_matches('/')
    }

    pub fn validate(&self) -> Result<()> {
        if self.api_base_url.trim().is_empty() {
            return Err(DadamError::Config("api_base_url must not be empty".into()));
        }
        if self.notification_cap == 0 {
            return Err(DadamError::Config("notification_cap must be at least 1".into()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = ClientConfig::from_toml_str(
            r#"
            api_base_url = "https://dadam.example.com/api/v1/"

            [storage_keys]
            answers = "answers_test"
            "#,
        )
        .unwrap();

        assert_eq!(config.api_base(), "https://dadam.example.com/api/v1");
        assert_eq!(config.notification_cap, 50);
        assert_eq!(config.storage_keys.answers, "answers_test");
        assert_eq!(config.storage_keys.notifications, "dadam_notifications_v1");
    }

    #[test]
    fn test_rejects_zero_cap() {
        let err = ClientConfig::from_toml_str("notification_cap = 0").unwrap_err();
        assert!(matches!(err, DadamError::Config(_)));
    }

    #[test]
    fn test_env_overrides() {
        let config = ClientConfig::default().with_overrides(|key| match key {
            ENV_API_BASE_URL => Some("http://10.0.0.2:9000/api/v1".to_string()),
            ENV_TIMEOUT_SECS => Some("not-a-number".to_string()),
            _ => None,
        });

        assert_eq!(config.api_base_url, "http://10.0.0.2:9000/api/v1");
        assert_eq!(config.timeout_secs, 10);
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let config = ClientConfig::load("/nonexistent/dadam.toml").unwrap();
        assert_eq!(config.timeout_secs, 10);
    }
}
