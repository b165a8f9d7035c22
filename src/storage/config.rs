//! Application configuration persisted as TOML.
//!
//! The configuration file is also where the language preference lives, so
//! [`TomlSettingsProvider`] exposes it to the translation store.

use crate::i18n::{Settings, SettingsProvider};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Application configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Application version
    pub version: String,
    /// Preferred language tag
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    /// UI settings
    pub ui: UiSettings,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            version: env!("CARGO_PKG_VERSION").to_string(),
            language: None,
            ui: UiSettings::default(),
        }
    }
}

impl AppConfig {
    /// The settings the translation store reads.
    pub fn settings(&self) -> Settings {
        Settings {
            language: self.language.clone(),
        }
    }
}

/// UI-related settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UiSettings {
    /// Font scale multiplier
    pub font_scale: f32,
}

impl Default for UiSettings {
    fn default() -> Self {
        Self { font_scale: 1.0 }
    }
}

/// Get the application data directory.
pub fn get_data_dir() -> PathBuf {
    directories::ProjectDirs::from("com", "bananas", "Bananas")
        .map(|dirs| dirs.data_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from("."))
}

/// Get the configuration file path.
pub fn get_config_path() -> PathBuf {
    get_data_dir().join("config.toml")
}

/// Load application configuration from `path`.
///
/// A missing file yields the defaults.
pub fn load_config_from(path: &Path) -> Result<AppConfig, ConfigError> {
    if !path.exists() {
        return Ok(AppConfig::default());
    }

    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::IoError(e.to_string()))?;

    toml::from_str(&content).map_err(|e| ConfigError::ParseError(e.to_string()))
}

/// Save application configuration to `path`.
pub fn save_config_to(path: &Path, config: &AppConfig) -> Result<(), ConfigError> {
    // Ensure parent directory exists
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| ConfigError::IoError(e.to_string()))?;
    }

    let content = toml::to_string_pretty(config).map_err(|e| ConfigError::SerializeError(e.to_string()))?;

    std::fs::write(path, content).map_err(|e| ConfigError::IoError(e.to_string()))?;

    Ok(())
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    IoError(String),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Serialize error: {0}")]
    SerializeError(String),
}

/// Reads the language preference from the TOML configuration file.
#[derive(Debug, Clone)]
pub struct TomlSettingsProvider {
    path: PathBuf,
}

impl TomlSettingsProvider {
    /// Provider over the configuration file at `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Provider over the default configuration file.
    pub fn from_default_location() -> Self {
        Self::new(get_config_path())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SettingsProvider for TomlSettingsProvider {
    async fn get_settings(&self) -> Option<Settings> {
        let path = self.path.clone();

        match tokio::task::spawn_blocking(move || load_config_from(&path)).await {
            Ok(Ok(config)) => Some(config.settings()),
            Ok(Err(e)) => {
                tracing::warn!("Could not read settings from {}: {}", self.path.display(), e);
                None
            }
            Err(e) => {
                tracing::warn!("Settings reader task failed: {}", e);
                None
            }
        }
    }
}
