//! Whole-ledger snapshots and their interchange formats
//!
//! A [`Snapshot`] is every account, category and operation at one moment.
//! Codecs turn it into bytes and back:
//! - JSON and YAML: three named arrays of records, lossless
//! - CSV: three marked sections, tolerant of malformed records
//!
//! The [`Reconciler`] applies a decoded snapshot to live storage.

pub mod csv;
pub mod json;
pub mod reconcile;
pub mod yaml;

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{LedgerError, LedgerResult};
use crate::models::{Account, Category, Operation};
use crate::storage::Storage;

pub use self::csv::CsvCodec;
pub use self::json::JsonCodec;
pub use self::reconcile::{ApplyMode, ApplySummary, Reconciler};
pub use self::yaml::YamlCodec;

/// The full ledger as plain data
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Snapshot {
    pub accounts: Vec<Account>,
    pub categories: Vec<Category>,
    pub operations: Vec<Operation>,
}

impl Snapshot {
    /// Read all three stores, each ordered by ID
    pub fn from_storage(storage: &Storage) -> LedgerResult<Self> {
        Ok(Self {
            accounts: storage.accounts.list()?,
            categories: storage.categories.list()?,
            operations: storage.operations.list()?,
        })
    }

    pub fn is_empty(&self) -> bool {
        self.accounts.is_empty() && self.categories.is_empty() && self.operations.is_empty()
    }
}

/// Supported interchange formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SnapshotFormat {
    #[default]
    Json,
    Csv,
    Yaml,
}

impl SnapshotFormat {
    pub const ALL: [SnapshotFormat; 3] = [Self::Json, Self::Csv, Self::Yaml];

    /// Dispatch tag, also used as the file extension
    pub const fn tag(&self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Csv => "csv",
            Self::Yaml => "yaml",
        }
    }

    /// Look up a format by tag, ignoring case
    pub fn from_tag(tag: &str) -> LedgerResult<Self> {
        let wanted = tag.trim().to_lowercase();
        Self::ALL
            .into_iter()
            .find(|f| f.tag() == wanted)
            .ok_or_else(|| LedgerError::Format(format!("Unsupported format: {}", tag)))
    }

    /// Infer the format from a file extension
    pub fn from_path<P: AsRef<Path>>(path: P) -> LedgerResult<Self> {
        let path = path.as_ref();
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_lowercase)
            .ok_or_else(|| {
                LedgerError::Format(format!(
                    "Cannot infer format of {}: no file extension",
                    path.display()
                ))
            })?;

        match ext.as_str() {
            "yml" => Ok(Self::Yaml),
            other => Self::from_tag(other),
        }
    }

    /// Codec with default options for this format
    pub fn codec(&self) -> Box<dyn SnapshotCodec> {
        match self {
            Self::Json => Box::new(JsonCodec::pretty()),
            Self::Csv => Box::new(CsvCodec),
            Self::Yaml => Box::new(YamlCodec),
        }
    }
}

impl fmt::Display for SnapshotFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

impl FromStr for SnapshotFormat {
    type Err = LedgerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_tag(s)
    }
}

/// Converts a snapshot to bytes and back
pub trait SnapshotCodec {
    fn format(&self) -> SnapshotFormat;

    fn encode(&self, snapshot: &Snapshot) -> LedgerResult<Vec<u8>>;

    fn decode(&self, bytes: &[u8]) -> LedgerResult<Snapshot>;
}

/// Codec registry keyed by tag
pub fn codec_for(tag: &str) -> LedgerResult<Box<dyn SnapshotCodec>> {
    Ok(SnapshotFormat::from_tag(tag)?.codec())
}

const BOM: &[u8] = b"\xEF\xBB\xBF";

pub(crate) fn strip_bom(bytes: &[u8]) -> &[u8] {
    bytes.strip_prefix(BOM).unwrap_or(bytes)
}
