//! File I/O utilities with atomic writes
//!
//! Snapshot files are written to a temp file and renamed into place, so a
//! crash mid-export never leaves a truncated ledger file behind.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::error::{LedgerError, LedgerResult};

/// Read a whole file, returning `None` if it does not exist
pub fn read_bytes<P: AsRef<Path>>(path: P) -> LedgerResult<Option<Vec<u8>>> {
    let path = path.as_ref();

    if !path.exists() {
        return Ok(None);
    }

    fs::read(path)
        .map(Some)
        .map_err(|e| LedgerError::Io(format!("Failed to read {}: {}", path.display(), e)))
}

/// Write bytes to a file atomically (write to temp, then rename)
pub fn write_atomic<P: AsRef<Path>>(path: P, bytes: &[u8]) -> LedgerResult<()> {
    let path = path.as_ref();

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| {
            LedgerError::Io(format!(
                "Failed to create directory {}: {}",
                parent.display(),
                e
            ))
        })?;
    }

    // Temp file in the same directory keeps the rename atomic
    let mut temp_name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    temp_name.push(".tmp");
    let temp_path = path.with_file_name(temp_name);

    let file = File::create(&temp_path)
        .map_err(|e| LedgerError::Io(format!("Failed to create temp file: {}", e)))?;

    let mut writer = BufWriter::new(file);
    writer
        .write_all(bytes)
        .map_err(|e| LedgerError::Io(format!("Failed to write data: {}", e)))?;

    writer
        .flush()
        .map_err(|e| LedgerError::Io(format!("Failed to flush data: {}", e)))?;

    writer
        .get_ref()
        .sync_all()
        .map_err(|e| LedgerError::Io(format!("Failed to sync data: {}", e)))?;

    fs::rename(&temp_path, path).map_err(|e| {
        let _ = fs::remove_file(&temp_path);
        LedgerError::Io(format!("Failed to rename temp file: {}", e))
    })?;

    Ok(())
}
