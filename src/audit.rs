//! Append-only JSON-lines record of deleted messages.

use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AuditError {
    #[error("cannot determine home directory")]
    NoHomeDirectory,

    #[error("unable to create audit directory {path}: {source}")]
    CreateDirectory { path: PathBuf, source: std::io::Error },

    #[error("unable to write audit log {path}: {source}")]
    Write { path: PathBuf, source: std::io::Error },

    #[error("unable to encode audit entry: {0}")]
    Encode(#[from] serde_json::Error),
}

/// One line of the audit file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditEntry {
    pub queue: String,
    pub message_id: String,
    /// RFC 3339, UTC
    pub timestamp: String,
    pub user: String,
}

impl AuditEntry {
    pub fn deletion(queue: &str, message_id: &str) -> Self {
        Self {
            queue: queue.to_string(),
            message_id: message_id.to_string(),
            timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true),
            user: current_user(),
        }
    }
}

/// Shared handle to the audit file; clones write to the same file.
#[derive(Debug, Clone)]
pub struct AuditLog {
    path: Option<PathBuf>,
    lock: Arc<Mutex<()>>,
}

impl AuditLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: Some(path.into()),
            lock: Arc::new(Mutex::new(())),
        }
    }

    /// An audit log that accepts and discards every entry
    pub fn disabled() -> Self {
        Self {
            path: None,
            lock: Arc::new(Mutex::new(())),
        }
    }

    /// `~/.sqsdeck/audit.log`
    pub fn default_path() -> Result<PathBuf, AuditError> {
        dirs::home_dir()
            .map(|home| home.join(".sqsdeck").join("audit.log"))
            .ok_or(AuditError::NoHomeDirectory)
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Record the deletion of `message_id` from `queue`.
    ///
    /// The entry is flushed to disk before returning.
    pub fn append_deletion(&self, queue: &str, message_id: &str) -> Result<(), AuditError> {
        self.append(&AuditEntry::deletion(queue, message_id))
    }

    pub fn append(&self, entry: &AuditEntry) -> Result<(), AuditError> {
        let Some(path) = &self.path else {
            return Ok(());
        };

        let mut line = serde_json::to_vec(entry)?;
        line.push(b'\n');

        // Serializes first-time directory creation between concurrent deletes
        let _guard = self.lock.lock().unwrap_or_else(|poisoned| poisoned.into_inner());

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|source| AuditError::CreateDirectory {
                path: parent.to_path_buf(),
                source,
            })?;
        }

        let write_error = |source: std::io::Error| AuditError::Write {
            path: path.clone(),
            source,
        };
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .map_err(write_error)?;
        file.write_all(&line).map_err(write_error)?;
        file.sync_all().map_err(write_error)?;

        log::debug!("Audit: {} deleted from {}", entry.message_id, entry.queue);
        Ok(())
    }
}

/// OS user name from the environment, else "unknown"
pub fn current_user() -> String {
    ["USER", "USERNAME", "LOGNAME"]
        .iter()
        .filter_map(|key| std::env::var(key).ok())
        .find(|name| !name.is_empty())
        .unwrap_or_else(|| "unknown".to_string())
}
