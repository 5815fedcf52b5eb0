//! CLI command for ledger import

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use super::export::{resolve_format, FormatArg};
use crate::config::Settings;
use crate::error::{LedgerError, LedgerResult};
use crate::services::TransferService;
use crate::snapshot::ApplyMode;
use crate::storage::Storage;

/// Read a snapshot file and apply it to the working ledger
///
/// Without `merge` the working ledger is replaced. CSV records that cannot
/// be parsed are skipped with a warning on stderr.
pub fn handle_import_command(
    storage: &Storage,
    settings: &Settings,
    input: &Path,
    format: Option<FormatArg>,
    merge: bool,
) -> LedgerResult<()> {
    let format = resolve_format(format, input, settings);
    let mode = if merge {
        ApplyMode::Merge
    } else {
        ApplyMode::Overwrite
    };

    let file = File::open(input)
        .map_err(|e| LedgerError::Io(format!("Failed to open {}: {}", input.display(), e)))?;
    let mut reader = BufReader::new(file);

    let summary = TransferService::new(storage).import_and_apply(format, &mut reader, mode)?;

    println!("Imported {} ({})", input.display(), summary);
    Ok(())
}
