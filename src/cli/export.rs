//! CLI command for ledger export

use std::path::Path;

use clap::ValueEnum;

use crate::config::Settings;
use crate::error::LedgerResult;
use crate::services::TransferService;
use crate::snapshot::SnapshotFormat;
use crate::storage::{write_atomic, Storage};

/// Interchange format options
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum FormatArg {
    /// JSON (lossless)
    Json,
    /// Sectioned CSV (spreadsheet-friendly)
    Csv,
    /// YAML (lossless, human-readable)
    Yaml,
}

impl From<FormatArg> for SnapshotFormat {
    fn from(format: FormatArg) -> Self {
        match format {
            FormatArg::Json => SnapshotFormat::Json,
            FormatArg::Csv => SnapshotFormat::Csv,
            FormatArg::Yaml => SnapshotFormat::Yaml,
        }
    }
}

/// Pick the explicit format, else the one the extension names, else the default
pub(crate) fn resolve_format(
    explicit: Option<FormatArg>,
    path: &Path,
    settings: &Settings,
) -> SnapshotFormat {
    match explicit {
        Some(format) => format.into(),
        None => SnapshotFormat::from_path(path).unwrap_or(settings.default_format),
    }
}

/// Write the whole ledger to `output`
pub fn handle_export_command(
    storage: &Storage,
    settings: &Settings,
    output: &Path,
    format: Option<FormatArg>,
) -> LedgerResult<()> {
    let format = resolve_format(format, output, settings);

    let mut buffer = Vec::new();
    TransferService::new(storage)
        .with_pretty_json(settings.pretty_json)
        .export(format, &mut buffer)?;
    write_atomic(output, &buffer)?;

    println!(
        "Exported {} account(s), {} category(ies), {} operation(s) to {} ({})",
        storage.accounts.count()?,
        storage.categories.count()?,
        storage.operations.count()?,
        output.display(),
        format
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_resolve_format() {
        let settings = Settings {
            default_format: SnapshotFormat::Yaml,
            ..Settings::default()
        };

        assert_eq!(
            resolve_format(Some(FormatArg::Csv), &PathBuf::from("a.json"), &settings),
            SnapshotFormat::Csv
        );
        assert_eq!(
            resolve_format(None, &PathBuf::from("a.json"), &settings),
            SnapshotFormat::Json
        );
        assert_eq!(
            resolve_format(None, &PathBuf::from("backup"), &settings),
            SnapshotFormat::Yaml
        );
    }
}
