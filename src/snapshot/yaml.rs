//! YAML snapshot codec
//!
//! Same shape as the JSON codec, as a YAML mapping with three sequences.

use tracing::debug;

use super::{strip_bom, Snapshot, SnapshotCodec, SnapshotFormat};
use crate::error::{LedgerError, LedgerResult};

#[derive(Debug, Clone, Copy, Default)]
pub struct YamlCodec;

impl SnapshotCodec for YamlCodec {
    fn format(&self) -> SnapshotFormat {
        SnapshotFormat::Yaml
    }

    fn encode(&self, snapshot: &Snapshot) -> LedgerResult<Vec<u8>> {
        Ok(serde_yaml::to_string(snapshot)?.into_bytes())
    }

    fn decode(&self, bytes: &[u8]) -> LedgerResult<Snapshot> {
        let text = std::str::from_utf8(strip_bom(bytes))
            .map_err(|e| LedgerError::Format(format!("YAML: input is not UTF-8: {}", e)))?;
        if text.trim().is_empty() {
            return Err(LedgerError::Format("YAML: input is empty".into()));
        }

        let snapshot: Snapshot = serde_yaml::from_str(text)?;
        debug!(
            accounts = snapshot.accounts.len(),
            categories = snapshot.categories.len(),
            operations = snapshot.operations.len(),
            "decoded YAML snapshot"
        );
        Ok(snapshot)
    }
}
