//! JSON snapshot codec
//!
//! `{"accounts": [...], "categories": [...], "operations": [...]}` with
//! camelCase operation fields, ISO dates and decimal amounts.

use tracing::debug;

use super::{strip_bom, Snapshot, SnapshotCodec, SnapshotFormat};
use crate::error::{LedgerError, LedgerResult};

/// JSON codec; pretty-printed unless built with [`JsonCodec::compact`]
#[derive(Debug, Clone, Copy)]
pub struct JsonCodec {
    pretty: bool,
}

impl JsonCodec {
    pub fn pretty() -> Self {
        Self { pretty: true }
    }

    pub fn compact() -> Self {
        Self { pretty: false }
    }
}

impl Default for JsonCodec {
    fn default() -> Self {
        Self::pretty()
    }
}

impl SnapshotCodec for JsonCodec {
    fn format(&self) -> SnapshotFormat {
        SnapshotFormat::Json
    }

    fn encode(&self, snapshot: &Snapshot) -> LedgerResult<Vec<u8>> {
        let mut bytes = if self.pretty {
            serde_json::to_vec_pretty(snapshot)?
        } else {
            serde_json::to_vec(snapshot)?
        };
        bytes.push(b'\n');
        Ok(bytes)
    }

    fn decode(&self, bytes: &[u8]) -> LedgerResult<Snapshot> {
        let bytes = strip_bom(bytes);
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Err(LedgerError::Format("JSON: input is empty".into()));
        }

        let snapshot: Snapshot = serde_json::from_slice(bytes)?;
        debug!(
            accounts = snapshot.accounts.len(),
            categories = snapshot.categories.len(),
            operations = snapshot.operations.len(),
            "decoded JSON snapshot"
        );
        Ok(snapshot)
    }
}
