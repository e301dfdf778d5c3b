//! Change log configuration.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Configuration for the change log written when actions fire.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditConfig {
    /// Whether change logging is enabled.
    #[serde(default = "default_enabled")]
    pub enabled: bool,

    /// Also echo each entry to stdout.
    #[serde(default)]
    pub stdout: bool,

    /// Directory holding the change log file.
    #[serde(default = "default_directory")]
    pub directory: String,

    /// File name inside `directory`.
    #[serde(default = "default_file_name")]
    pub file_name: String,
}

impl AuditConfig {
    /// Full path of the change log file.
    pub fn log_path(&self) -> PathBuf {
        let mut path = PathBuf::from(&self.directory);
        path.push(&self.file_name);
        path
    }
}

impl Default for AuditConfig {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            stdout: false,
            directory: default_directory(),
            file_name: default_file_name(),
        }
    }
}

fn default_enabled() -> bool {
    true
}

fn default_directory() -> String {
    ".".to_string()
}

fn default_file_name() -> String {
    "changes.log".to_string()
}
