//! CLI command handlers
//!
//! This module contains the implementation of CLI commands, bridging the
//! clap argument parsing with the service layer. Every handler runs against
//! a [`Workspace`]: the working ledger file loaded into memory for the
//! duration of one command. Handlers return `true` when they changed the
//! ledger so the caller knows to write it back.

pub mod account;
pub mod category;
pub mod export;
pub mod import;
pub mod operation;
pub mod report;

pub use account::{handle_account_command, AccountCommands};
pub use category::{handle_category_command, CategoryCommands};
pub use export::{handle_export_command, FormatArg};
pub use import::handle_import_command;
pub use operation::{handle_operation_command, KindArg, OperationCommands};
pub use report::handle_report_command;

use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use tracing::debug;

use crate::config::Settings;
use crate::error::{LedgerError, LedgerResult};
use crate::snapshot::{ApplyMode, SnapshotFormat};
use crate::services::TransferService;
use crate::storage::{read_bytes, write_atomic, Storage};

/// The working ledger file, loaded into memory
pub struct Workspace {
    storage: Storage,
    path: PathBuf,
    format: SnapshotFormat,
    pretty_json: bool,
}

impl Workspace {
    /// Load `path` if it exists; a missing file is an empty ledger
    ///
    /// The format comes from the file extension, falling back to the
    /// configured default.
    pub fn open(path: PathBuf, settings: &Settings) -> LedgerResult<Self> {
        let format = SnapshotFormat::from_path(&path).unwrap_or(settings.default_format);
        let storage = Storage::new();

        if let Some(bytes) = read_bytes(&path)? {
            let summary = TransferService::new(&storage).import_and_apply(
                format,
                &mut bytes.as_slice(),
                ApplyMode::Overwrite,
            )?;
            debug!(path = %path.display(), %format, %summary, "working ledger loaded");
        }

        Ok(Self {
            storage,
            path,
            format,
            pretty_json: settings.pretty_json,
        })
    }

    pub fn storage(&self) -> &Storage {
        &self.storage
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Write the ledger back to its file atomically
    pub fn save(&self) -> LedgerResult<()> {
        let mut buffer = Vec::new();
        TransferService::new(&self.storage)
            .with_pretty_json(self.pretty_json)
            .export(self.format, &mut buffer)?;
        write_atomic(&self.path, &buffer)?;

        debug!(path = %self.path.display(), "working ledger saved");
        Ok(())
    }
}

/// Parse a YYYY-MM-DD date argument
pub(crate) fn parse_date(value: &str) -> LedgerResult<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").map_err(|_| {
        LedgerError::Validation(format!(
            "Invalid date: '{}'. Use the format YYYY-MM-DD",
            value
        ))
    })
}
