//! User settings for pocket-ledger
//!
//! Stored as `config.json` in the base directory. Every field has a
//! default, so older or hand-trimmed files still load.

use serde::{Deserialize, Serialize};

use super::paths::LedgerPaths;
use crate::error::LedgerError;
use crate::snapshot::SnapshotFormat;
use crate::storage::write_atomic;

/// User settings for pocket-ledger
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    /// Schema version for migration support
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,

    /// Format used when a file's extension does not name one
    #[serde(default)]
    pub default_format: SnapshotFormat,

    /// Indent JSON output
    #[serde(default = "default_pretty_json")]
    pub pretty_json: bool,

    /// `tracing` filter used when RUST_LOG is unset
    #[serde(default = "default_log_filter")]
    pub log_filter: String,
}

fn default_schema_version() -> u32 {
    1
}

fn default_pretty_json() -> bool {
    true
}

fn default_log_filter() -> String {
    "pocket_ledger=info".to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            schema_version: default_schema_version(),
            default_format: SnapshotFormat::default(),
            pretty_json: default_pretty_json(),
            log_filter: default_log_filter(),
        }
    }
}

impl Settings {
    /// Load settings from disk, or return defaults if the file doesn't exist
    pub fn load_or_create(paths: &LedgerPaths) -> Result<Self, LedgerError> {
        let settings_path = paths.settings_file();

        if !settings_path.exists() {
            // Not persisted until the caller saves
            return Ok(Settings::default());
        }

        let contents = std::fs::read_to_string(&settings_path)
            .map_err(|e| LedgerError::Io(format!("Failed to read settings file: {}", e)))?;

        serde_json::from_str(&contents)
            .map_err(|e| LedgerError::Config(format!("Failed to parse settings file: {}", e)))
    }

    /// Save settings to disk
    pub fn save(&self, paths: &LedgerPaths) -> Result<(), LedgerError> {
        paths.ensure_directories()?;

        let contents = serde_json::to_string_pretty(self)
            .map_err(|e| LedgerError::Config(format!("Failed to serialize settings: {}", e)))?;

        write_atomic(paths.settings_file(), contents.as_bytes())
    }
}
