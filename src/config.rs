//! Configuration management for sqsdeck
//!
//! This module handles loading, parsing, and validation of configuration files.

use crate::constants::{
    APP_DIR_NAME, CONFIG_FILE_NAME, CONFIG_GENERATED, DEFAULT_PROFILE, MAX_RECEIVE_COUNT, REFRESH_INTERVAL_ENV, REFRESH_INTERVAL_RANGE,
    REQUEST_TIMEOUT_RANGE,
};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct Config {
    pub ui: UiConfig,
    pub aws: AwsConfig,
    pub logging: LoggingConfig,
    pub audit: AuditConfig,
}

/// UI configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct UiConfig {
    /// Seconds between automatic reloads of the overview and details screens
    pub refresh_interval_seconds: u64,
    /// Seconds a success/failure toast stays visible
    pub toast_seconds: u64,
    /// Messages received per fetch (SQS caps this at 10)
    pub message_fetch_count: u32,
}

/// AWS connection configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AwsConfig {
    pub region: String,
    /// Section of the shared credentials file used when the environment has no keys
    pub profile: String,
    /// Custom endpoint, e.g. a local SQS emulator
    #[serde(skip_serializing_if = "Option::is_none")]
    pub endpoint_url: Option<String>,
    /// Deadline applied to every remote call
    pub request_timeout_seconds: u64,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct LoggingConfig {
    /// Enable logging
    pub enabled: bool,
    /// One of trace, debug, info, warn, error
    pub level: String,
    /// Log file path (defaults to the data directory)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<PathBuf>,
}

/// Deletion audit log configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AuditConfig {
    pub enabled: bool,
    /// Audit file path (defaults to ~/.sqsdeck/audit.log)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            refresh_interval_seconds: 5,
            toast_seconds: 3,
            message_fetch_count: MAX_RECEIVE_COUNT,
        }
    }
}

impl Default for AwsConfig {
    fn default() -> Self {
        Self {
            region: "us-east-1".to_string(),
            profile: DEFAULT_PROFILE.to_string(),
            endpoint_url: None,
            request_timeout_seconds: 10,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            level: "info".to_string(),
            file: None,
        }
    }
}

impl Default for AuditConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            path: None,
        }
    }
}

impl UiConfig {
    pub fn refresh_interval(&self) -> Duration {
        Duration::from_secs(self.refresh_interval_seconds)
    }

    pub fn toast_duration(&self) -> Duration {
        Duration::from_secs(self.toast_seconds)
    }
}

impl AwsConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_seconds)
    }
}

impl LoggingConfig {
    pub fn level_filter(&self) -> log::LevelFilter {
        match self.level.to_lowercase().as_str() {
            "trace" => log::LevelFilter::Trace,
            "debug" => log::LevelFilter::Debug,
            "warn" => log::LevelFilter::Warn,
            "error" => log::LevelFilter::Error,
            _ => log::LevelFilter::Info,
        }
    }
}

impl Config {
    /// Load configuration from an explicit path, a discovered file, or defaults,
    /// then apply environment overrides.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let mut config = match explicit {
            Some(path) => Self::load_from_file(path)?,
            None => match Self::find_config_file()? {
                Some(path) => Self::load_from_file(&path)?,
                None => Self::default(),
            },
        };

        config.apply_overrides(|key| std::env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a specific file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file: {}", path.as_ref().display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.as_ref().display()))?;

        config.validate()?;
        Ok(config)
    }

    /// Find configuration file in order of precedence
    fn find_config_file() -> Result<Option<PathBuf>> {
        // 1. Check current directory
        let current_dir_config = PathBuf::from(CONFIG_FILE_NAME);
        if current_dir_config.exists() {
            return Ok(Some(current_dir_config));
        }

        // 2. Check XDG config directory
        if let Some(config_dir) = dirs::config_dir() {
            let xdg_config = config_dir.join(APP_DIR_NAME).join("config.toml");
            if xdg_config.exists() {
                return Ok(Some(xdg_config));
            }
        }

        Ok(None)
    }

    /// Apply environment overrides; `lookup` is `std::env::var` outside tests.
    ///
    /// A refresh interval that is not a positive integer is ignored.
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(raw) = lookup(REFRESH_INTERVAL_ENV) {
            match raw.trim().parse::<u64>() {
                Ok(seconds) if seconds > 0 => self.ui.refresh_interval_seconds = seconds,
                _ => log::warn!("Ignoring invalid {REFRESH_INTERVAL_ENV}={raw}"),
            }
        }

        if let Some(region) = lookup("AWS_REGION")
            .or_else(|| lookup("AWS_DEFAULT_REGION"))
            .filter(|r| !r.is_empty())
        {
            self.aws.region = region;
        }

        if let Some(profile) = lookup("AWS_PROFILE").filter(|p| !p.is_empty()) {
            self.aws.profile = profile;
        }

        if let Some(endpoint) = lookup("AWS_ENDPOINT_URL").filter(|e| !e.is_empty()) {
            self.aws.endpoint_url = Some(endpoint);
        }
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        if !REFRESH_INTERVAL_RANGE.contains(&self.ui.refresh_interval_seconds) {
            anyhow::bail!(
                "refresh_interval_seconds must be between {} and {}, got {}",
                REFRESH_INTERVAL_RANGE.start(),
                REFRESH_INTERVAL_RANGE.end(),
                self.ui.refresh_interval_seconds
            );
        }

        if self.ui.message_fetch_count == 0 || self.ui.message_fetch_count > MAX_RECEIVE_COUNT {
            anyhow::bail!(
                "message_fetch_count must be between 1 and {}, got {}",
                MAX_RECEIVE_COUNT,
                self.ui.message_fetch_count
            );
        }

        if self.aws.region.trim().is_empty() {
            anyhow::bail!("aws.region cannot be empty");
        }

        if self.aws.profile.trim().is_empty() {
            anyhow::bail!("aws.profile cannot be empty");
        }

        if !REQUEST_TIMEOUT_RANGE.contains(&self.aws.request_timeout_seconds) {
            anyhow::bail!(
                "request_timeout_seconds must be between {} and {}, got {}",
                REQUEST_TIMEOUT_RANGE.start(),
                REQUEST_TIMEOUT_RANGE.end(),
                self.aws.request_timeout_seconds
            );
        }

        if let Some(endpoint) = &self.aws.endpoint_url {
            if !endpoint.starts_with("http://") && !endpoint.starts_with("https://") {
                anyhow::bail!("endpoint_url must start with http:// or https://, got '{}'", endpoint);
            }
        }

        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.logging.level.to_lowercase().as_str()) {
            anyhow::bail!(
                "Invalid logging level '{}'. Expected one of: {}",
                self.logging.level,
                valid_levels.join(", ")
            );
        }

        Ok(())
    }

    /// Generate default configuration file
    pub fn generate_default_config<P: AsRef<Path>>(path: P) -> Result<()> {
        let config = Self::default();
        let toml_content = toml::to_string_pretty(&config).context("Failed to serialize default config")?;

        // Add header comment
        let header = format!(
            "# sqsdeck Configuration File\n# Generated on {}\n#\n# [aws] endpoint_url = \"http://localhost:4566\" targets a local emulator\n\n",
            chrono::Local::now().format("%Y-%m-%d")
        );

        let full_content = header + &toml_content;

        // Ensure the parent directory exists
        if let Some(parent) = path.as_ref().parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create config directory: {}", parent.display()))?;
        }

        std::fs::write(&path, full_content)
            .with_context(|| format!("Failed to write config file: {}", path.as_ref().display()))?;

        println!("{}: {}", CONFIG_GENERATED, path.as_ref().display());
        Ok(())
    }

    /// Get the XDG config directory path
    pub fn get_xdg_config_dir() -> Result<PathBuf> {
        dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))
            .map(|dir| dir.join(APP_DIR_NAME))
    }

    /// Get the default config file path
    pub fn get_default_config_path() -> Result<PathBuf> {
        Ok(Self::get_xdg_config_dir()?.join("config.toml"))
    }
}
