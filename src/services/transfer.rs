//! Export/import service
//!
//! Moves the whole ledger in and out of the interchange formats: export
//! snapshots the stores and encodes them, import decodes bytes into a
//! snapshot, and apply hands a snapshot to the reconciler.

use std::io::{Read, Write};

use tracing::info;

use crate::error::LedgerResult;
use crate::snapshot::{
    ApplyMode, ApplySummary, JsonCodec, Reconciler, Snapshot, SnapshotCodec, SnapshotFormat,
};
use crate::storage::Storage;

/// Service for snapshot export and import
pub struct TransferService<'a> {
    storage: &'a Storage,
    pretty_json: bool,
}

impl<'a> TransferService<'a> {
    pub fn new(storage: &'a Storage) -> Self {
        Self {
            storage,
            pretty_json: true,
        }
    }

    /// Choose between indented and single-line JSON output
    pub fn with_pretty_json(mut self, pretty: bool) -> Self {
        self.pretty_json = pretty;
        self
    }

    fn codec(&self, format: SnapshotFormat) -> Box<dyn SnapshotCodec> {
        match format {
            SnapshotFormat::Json if !self.pretty_json => Box::new(JsonCodec::compact()),
            other => other.codec(),
        }
    }

    /// Snapshot the current ledger
    pub fn snapshot(&self) -> LedgerResult<Snapshot> {
        Snapshot::from_storage(self.storage)
    }

    /// Encode the current ledger into `writer`; returns the byte count
    pub fn export<W: Write>(&self, format: SnapshotFormat, writer: &mut W) -> LedgerResult<usize> {
        let snapshot = self.snapshot()?;
        let bytes = self.codec(format).encode(&snapshot)?;
        writer.write_all(&bytes)?;
        writer.flush()?;

        info!(
            %format,
            accounts = snapshot.accounts.len(),
            categories = snapshot.categories.len(),
            operations = snapshot.operations.len(),
            bytes = bytes.len(),
            "ledger exported"
        );
        Ok(bytes.len())
    }

    /// Encode the current ledger as text, looking the format up by tag
    pub fn export_to_string(&self, tag: &str) -> LedgerResult<String> {
        let format = SnapshotFormat::from_tag(tag)?;
        let mut buffer = Vec::new();
        self.export(format, &mut buffer)?;
        Ok(String::from_utf8_lossy(&buffer).into_owned())
    }

    /// Decode a snapshot without touching the stores
    pub fn import<R: Read>(&self, format: SnapshotFormat, reader: &mut R) -> LedgerResult<Snapshot> {
        let mut bytes = Vec::new();
        reader.read_to_end(&mut bytes)?;
        self.codec(format).decode(&bytes)
    }

    /// Apply a decoded snapshot to the stores
    pub fn apply(&self, snapshot: &Snapshot, mode: ApplyMode) -> LedgerResult<ApplySummary> {
        Reconciler::new(self.storage).apply(snapshot, mode)
    }

    /// Decode and apply in one step
    pub fn import_and_apply<R: Read>(
        &self,
        format: SnapshotFormat,
        reader: &mut R,
        mode: ApplyMode,
    ) -> LedgerResult<ApplySummary> {
        let snapshot = self.import(format, reader)?;
        self.apply(&snapshot, mode)
    }
}
