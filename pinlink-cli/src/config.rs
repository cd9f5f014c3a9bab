//! Configuration: `config.json` in the pinlink config directory, overlaid by environment variables

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use pinlink_core::types::{DeploySettings, ExportSettings};
use pinlink_provider::{ClientConfig, DEFAULT_API_BASE};
use serde::{Deserialize, Serialize};

const APP_DIR_NAME: &str = "pinlink";
const CONFIG_FILE_NAME: &str = "config.json";

pub const ENV_API_BASE: &str = "PINLINK_API_BASE";
pub const ENV_PREVIEW_BASE: &str = "PINLINK_PREVIEW_BASE";
pub const ENV_SECRET: &str = "PINLINK_SECRET";

/// Platform config directory for pinlink (`~/.config/pinlink` on Linux).
pub fn app_dir() -> Result<PathBuf> {
    dirs::config_dir()
        .map(|dir| dir.join(APP_DIR_NAME))
        .context("Failed to determine config directory")
}

/// Directory for exported archives: downloads, else home.
pub fn default_download_dir() -> Option<PathBuf> {
    dirs::download_dir().or_else(dirs::home_dir)
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    pub poll_interval_secs: u64,
    pub max_polls: Option<u32>,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            poll_interval_secs: pinlink_core::types::DEFAULT_POLL_INTERVAL.as_secs(),
            max_polls: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub api_base: String,
    pub preview_base: String,
    pub subdomain_suffix: String,
    pub shared_secret: Option<String>,
    pub availability_path: String,
    pub availability_fallback_path: String,
    pub export: ExportConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        let client = ClientConfig::default();
        let deploy = DeploySettings::default();
        Self {
            api_base: DEFAULT_API_BASE.to_string(),
            preview_base: deploy.preview_base,
            subdomain_suffix: deploy.subdomain_suffix,
            shared_secret: None,
            availability_path: client.availability_path,
            availability_fallback_path: client.availability_fallback_path,
            export: ExportConfig::default(),
        }
    }
}

impl AppConfig {
    /// Load `config.json` from `dir`; a missing file yields defaults.
    pub async fn load_from(dir: &Path) -> Result<Self> {
        let path = dir.join(CONFIG_FILE_NAME);
        match tokio::fs::read_to_string(&path).await {
            Ok(content) => serde_json::from_str(&content)
                .with_context(|| format!("Invalid config file {}", path.display())),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!("No config file at {}, using defaults", path.display());
                Ok(Self::default())
            }
            Err(e) => Err(e).with_context(|| format!("Failed to read {}", path.display())),
        }
    }

    /// Overlay values from the process environment.
    #[must_use]
    pub fn with_env(self) -> Self {
        self.with_overrides(|key| std::env::var(key).ok())
    }

    /// Overlay values from `lookup`; empty values are ignored.
    #[must_use]
    pub fn with_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        if let Some(v) = get(ENV_API_BASE) {
            self.api_base = v;
        }
        if let Some(v) = get(ENV_PREVIEW_BASE) {
            self.preview_base = v;
        }
        if let Some(v) = get(ENV_SECRET) {
            self.shared_secret = Some(v);
        }
        self
    }

    pub fn client_config(&self, device_id: Option<String>) -> ClientConfig {
        ClientConfig {
            api_base: self.api_base.clone(),
            availability_path: self.availability_path.clone(),
            availability_fallback_path: self.availability_fallback_path.clone(),
            device_id,
        }
    }

    pub fn deploy_settings(&self, device_id: Option<String>) -> DeploySettings {
        DeploySettings {
            preview_base: self.preview_base.clone(),
            subdomain_suffix: self.subdomain_suffix.clone(),
            shared_secret: self.shared_secret.clone(),
            device_id,
        }
    }

    pub fn export_settings(&self, default_dir: Option<PathBuf>) -> ExportSettings {
        ExportSettings {
            poll_interval: Duration::from_secs(self.export.poll_interval_secs.max(1)),
            max_polls: self.export.max_polls.filter(|n| *n > 0),
            default_dir,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = AppConfig::load_from(dir.path()).await.unwrap();
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.export.poll_interval_secs, 5);
    }

    #[tokio::test]
    async fn test_partial_file_keeps_other_defaults() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join(CONFIG_FILE_NAME),
            r#"{"api_base": "http://localhost:8080", "export": {"max_polls": 12}}"#,
        )
        .unwrap();

        let config = AppConfig::load_from(dir.path()).await.unwrap();
        assert_eq!(config.api_base, "http://localhost:8080");
        assert_eq!(config.export.max_polls, Some(12));
        assert_eq!(config.export.poll_interval_secs, 5);
        assert_eq!(config.availability_path, "/check_domain");
    }

    #[tokio::test]
    async fn test_invalid_json_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(CONFIG_FILE_NAME), "{not json").unwrap();
        assert!(AppConfig::load_from(dir.path()).await.is_err());
    }

    #[test]
    fn test_env_overrides() {
        let config = AppConfig::default().with_overrides(|key| match key {
            ENV_API_BASE => Some("http://api.test".to_string()),
            ENV_SECRET => Some("s3cret".to_string()),
            ENV_PREVIEW_BASE => Some("   ".to_string()),
            _ => None,
        });
        assert_eq!(config.api_base, "http://api.test");
        assert_eq!(config.shared_secret.as_deref(), Some("s3cret"));
        assert_eq!(config.preview_base, AppConfig::default().preview_base);
    }

    #[test]
    fn test_export_settings_ignore_zero_ceiling() {
        let mut config = AppConfig::default();
        config.export.max_polls = Some(0);
        config.export.poll_interval_secs = 0;
        let settings = config.export_settings(None);
        assert_eq!(settings.max_polls, None);
        assert_eq!(settings.poll_interval, Duration::from_secs(1));
    }
}
