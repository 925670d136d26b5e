// SPDX-License-Identifier: MIT

//! Configuration management for Ordo

use serde::{Deserialize, Serialize};
use std::path::Path;

/// Main application configuration
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct AppConfig {
    /// Gemini API configuration
    #[serde(default)]
    pub api: ApiConfig,

    /// File search settings
    #[serde(default)]
    pub search: SearchConfig,

    /// Session loop settings
    #[serde(default)]
    pub session: SessionConfig,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ApiConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
    /// Cap on tool-call rounds within a single chat turn
    #[serde(default = "default_tool_rounds")]
    pub max_tool_rounds: u32,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct SearchConfig {
    /// Root used when the model omits a search path
    #[serde(default = "default_search_root")]
    pub default_root: String,
    /// Hard cap on returned matches
    #[serde(default = "default_max_results")]
    pub max_results: usize,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct SessionConfig {
    #[serde(default = "default_retries")]
    pub max_retries: u32,
    /// Backoff base in seconds; attempt N waits N * base
    #[serde(default = "default_backoff")]
    pub backoff_base_secs: u64,
}

// Default value functions
fn default_base_url() -> String {
    "https://generativelanguage.googleapis.com/v1beta".to_string()
}
fn default_model() -> String {
    "gemini-flash-latest".to_string()
}
fn default_timeout() -> u64 {
    120
}
fn default_tool_rounds() -> u32 {
    8
}
fn default_max_results() -> usize {
    50
}
fn default_retries() -> u32 {
    3
}
fn default_backoff() -> u64 {
    10
}

#[cfg(windows)]
fn default_search_root() -> String {
    "C:/".to_string()
}

#[cfg(not(windows))]
fn default_search_root() -> String {
    "/".to_string()
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            model: default_model(),
            timeout_secs: default_timeout(),
            max_tool_rounds: default_tool_rounds(),
        }
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            default_root: default_search_root(),
            max_results: default_max_results(),
        }
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            max_retries: default_retries(),
            backoff_base_secs: default_backoff(),
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api: ApiConfig::default(),
            search: SearchConfig::default(),
            session: SessionConfig::default(),
        }
    }
}

impl AppConfig {
    /// Load configuration from a JSON file
    pub fn load(path: &Path) -> crate::Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            let config: Self = serde_json::from_str(&content)
                .map_err(|e| crate::OrdoError::Config(format!("Failed to parse config: {}", e)))?;
            Ok(config)
        } else {
            tracing::info!("Config file not found at {:?}, using defaults", path);
            Ok(Self::default())
        }
    }

    /// Save configuration to a JSON file
    pub fn save(&self, path: &Path) -> crate::Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_when_file_missing() {
        let config = AppConfig::load(Path::new("/nonexistent/ordo.json")).unwrap();
        assert_eq!(config.search.max_results, 50);
        assert_eq!(config.session.max_retries, 3);
        assert_eq!(config.session.backoff_base_secs, 10);
    }

    #[test]
    fn test_save_and_reload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");

        let mut config = AppConfig::default();
        config.search.max_results = 10;
        config.save(&path).unwrap();

        let loaded = AppConfig::load(&path).unwrap();
        assert_eq!(loaded.search.max_results, 10);
        assert_eq!(loaded.api.model, "gemini-flash-latest");
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{"search": {"max_results": 5}}"#).unwrap();

        let config = AppConfig::load(&path).unwrap();
        assert_eq!(config.search.max_results, 5);
        assert_eq!(config.api.timeout_secs, 120);
    }
}
