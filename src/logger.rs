//! File logging on top of the `log` facade.
//!
//! The terminal belongs to the UI, so log output only ever goes to a file.

use crate::config::LoggingConfig;
use crate::constants::APP_DIR_NAME;
use anyhow::{Context, Result};
use std::fs::OpenOptions;
use std::path::PathBuf;

/// Outcome of logger installation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Logger {
    enabled: bool,
    file: Option<PathBuf>,
}

impl Logger {
    /// Install a `fern` dispatch described by `config`.
    ///
    /// Nothing is installed when logging is disabled. If another logger is
    /// already installed the new one is dropped and a warning printed.
    pub fn from_config(config: &LoggingConfig) -> Result<Self> {
        if !config.enabled {
            return Ok(Self {
                enabled: false,
                file: None,
            });
        }

        let path = match &config.file {
            Some(path) => path.clone(),
            None => Self::get_log_file_path()?,
        };
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create log directory: {}", parent.display()))?;
        }
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .with_context(|| format!("Failed to open log file: {}", path.display()))?;

        let dispatch = fern::Dispatch::new()
            .format(|out, message, record| {
                out.finish(format_args!(
                    "[{} {} {}] {}",
                    chrono::Local::now().format("%Y-%m-%d %H:%M:%S"),
                    record.level(),
                    record.target(),
                    message
                ))
            })
            .level(config.level_filter())
            .chain(file);

        if let Err(e) = dispatch.apply() {
            eprintln!("Warning: logger already initialized: {e}");
        } else {
            log::info!("Logger initialized with level: {}", config.level);
        }

        Ok(Self {
            enabled: true,
            file: Some(path),
        })
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn file(&self) -> Option<&PathBuf> {
        self.file.as_ref()
    }

    /// Default log location inside the platform data directory
    pub fn get_log_file_path() -> Result<PathBuf> {
        dirs::data_dir()
            .or_else(dirs::home_dir)
            .ok_or_else(|| anyhow::anyhow!("Could not determine data directory"))
            .map(|dir| dir.join(APP_DIR_NAME).join("sqsdeck.log"))
    }
}
