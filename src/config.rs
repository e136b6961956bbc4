//! Configuration management for the application.
//!
//! This module handles loading, validating, and saving application configuration
//! in TOML format with platform-specific directory resolution.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::constants::{
    APP_DIR_NAME, CONFIG_DIR_ENV, DEFAULT_BACKEND_URL, DEFAULT_STYLES, DEFAULT_THUMBNAIL_URL,
};

/// Backend connection settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackendConfig {
    /// Base URL of the generation/recommendation service
    pub base_url: String,
    /// Per-request timeout in seconds (generation can be slow)
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
    /// Number of results requested from text search
    #[serde(default = "default_search_k")]
    pub search_k: usize,
}

fn default_request_timeout_secs() -> u64 {
    180
}

fn default_search_k() -> usize {
    10
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BACKEND_URL.to_string(),
            request_timeout_secs: default_request_timeout_secs(),
            search_k: default_search_k(),
        }
    }
}

impl BackendConfig {
    /// Request timeout as a `Duration`.
    #[must_use]
    pub const fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

/// Where models and thumbnails come from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetConfig {
    /// Base URL of the model proxy (`/s3-proxy/{item_id}` is appended).
    /// Defaults to the backend URL when unset.
    #[serde(default)]
    pub model_base_url: Option<String>,
    /// Base URL of the sharded thumbnail store
    pub thumbnail_base_url: String,
}

impl Default for AssetConfig {
    fn default() -> Self {
        Self {
            model_base_url: None,
            thumbnail_base_url: DEFAULT_THUMBNAIL_URL.to_string(),
        }
    }
}

/// What a generation round asks for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DesignConfig {
    /// Room type sent with every generation request
    pub room_type: String,
    /// One generation request is issued per style
    pub styles: Vec<String>,
}

impl Default for DesignConfig {
    fn default() -> Self {
        Self {
            room_type: "living room".to_string(),
            styles: DEFAULT_STYLES.iter().map(ToString::to_string).collect(),
        }
    }
}

/// Web server bind settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Host to bind to
    pub host: String,
    /// Port to listen on
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3001,
        }
    }
}

/// Application configuration.
///
/// # File Location
///
/// - Linux: `~/.config/InteriorRec/config.toml`
/// - macOS: `~/Library/Application Support/InteriorRec/config.toml`
/// - Windows: `%APPDATA%\InteriorRec\config.toml`
///
/// # Validation
///
/// - URLs must start with `http://` or `https://`
/// - `styles` must be non-empty and free of duplicates
/// - `search_k` must be at least 1
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Config {
    /// Backend connection
    #[serde(default)]
    pub backend: BackendConfig,
    /// Asset sources
    #[serde(default)]
    pub assets: AssetConfig,
    /// Generation settings
    #[serde(default)]
    pub design: DesignConfig,
    /// Web server
    #[serde(default)]
    pub server: ServerConfig,
}

impl Config {
    /// Creates a new Config with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Checks if the config file exists on disk.
    #[must_use]
    pub fn exists() -> bool {
        Self::config_file_path()
            .map(|path| path.exists())
            .unwrap_or(false)
    }

    /// Gets the platform-specific config directory path.
    ///
    /// `INTERIORREC_CONFIG_DIR` overrides the platform location.
    pub fn config_dir() -> Result<PathBuf> {
        if let Some(dir) = std::env::var_os(CONFIG_DIR_ENV) {
            return Ok(PathBuf::from(dir));
        }

        let config_dir = dirs::config_dir()
            .context("Failed to determine config directory")?
            .join(APP_DIR_NAME);

        Ok(config_dir)
    }

    /// Gets the full path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join("config.toml"))
    }

    /// Model proxy base URL, falling back to the backend URL.
    #[must_use]
    pub fn model_base_url(&self) -> &str {
        self.assets
            .model_base_url
            .as_deref()
            .unwrap_or(&self.backend.base_url)
    }

    /// Loads configuration from the config file.
    ///
    /// If the file doesn't exist, returns default configuration.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_file_path()?)
    }

    /// Loads configuration from an explicit path.
    pub fn load_from(config_path: &Path) -> Result<Self> {
        if !config_path.exists() {
            return Ok(Self::new());
        }

        let content = fs::read_to_string(config_path).context(format!(
            "Failed to read config file: {}",
            config_path.display()
        ))?;

        let config: Self = toml::from_str(&content).context(format!(
            "Failed to parse config file: {}",
            config_path.display()
        ))?;

        config.validate()?;
        Ok(config)
    }

    /// Saves configuration to the config file using atomic write.
    pub fn save(&self) -> Result<()> {
        let config_dir = Self::config_dir()?;
        fs::create_dir_all(&config_dir).context(format!(
            "Failed to create config directory: {}",
            config_dir.display()
        ))?;

        self.save_to(&Self::config_file_path()?)
    }

    /// Saves configuration to an explicit path.
    ///
    /// Uses temp file + rename pattern for atomic writes.
    pub fn save_to(&self, config_path: &Path) -> Result<()> {
        self.validate()?;

        let content = toml::to_string_pretty(self).context("Failed to serialize configuration")?;
        let temp_path = config_path.with_extension("toml.tmp");

        fs::write(&temp_path, content).context(format!(
            "Failed to write temp config file: {}",
            temp_path.display()
        ))?;

        fs::rename(&temp_path, config_path).context(format!(
            "Failed to rename temp config file to: {}",
            config_path.display()
        ))?;

        Ok(())
    }

    /// Validates configuration values.
    pub fn validate(&self) -> Result<()> {
        validate_url("backend.base_url", &self.backend.base_url)?;
        if let Some(url) = &self.assets.model_base_url {
            validate_url("assets.model_base_url", url)?;
        }
        validate_url("assets.thumbnail_base_url", &self.assets.thumbnail_base_url)?;

        if self.backend.search_k == 0 {
            anyhow::bail!("backend.search_k must be at least 1");
        }

        if self.design.styles.is_empty() {
            anyhow::bail!("design.styles must list at least one style");
        }

        for (i, style) in self.design.styles.iter().enumerate() {
            if style.trim().is_empty() {
                anyhow::bail!("design.styles[{i}] is empty");
            }
            if self.design.styles[..i].contains(style) {
                anyhow::bail!("design.styles lists '{style}' more than once");
            }
        }

        Ok(())
    }
}

fn validate_url(field: &str, url: &str) -> Result<()> {
    if !(url.starts_with("http://") || url.starts_with("https://")) {
        anyhow::bail!("{field} must be an http(s) URL (got '{url}')");
    }
    Ok(())
}
