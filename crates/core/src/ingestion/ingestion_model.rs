use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::classifier::{RawRow, RowKind};
use crate::events::IngestionEvent;

/// One uploaded file to ingest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IngestionRequest {
    pub amc_id: i64,
    pub disclosure_type_id: i64,
    /// Temporary location of the uploaded file.
    pub source_path: PathBuf,
    /// Name the file was uploaded under; used as the provisional upload name.
    pub file_name: String,
}

/// Final per-file outcome.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", tag = "status")]
pub enum IngestionOutcome {
    Success,
    SuccessWithWarnings { warnings: Vec<IngestionEvent> },
    /// The canonical name already belongs to another upload; nothing was persisted.
    Duplicate,
    /// The transaction was rolled back. `reason` is safe to show to users.
    Failed { reason: String },
}

impl IngestionOutcome {
    pub fn is_committed(&self) -> bool {
        matches!(self, Self::Success | Self::SuccessWithWarnings { .. })
    }
}

/// Counters accumulated over one file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IngestionStats {
    pub sheets: usize,
    pub snapshots: usize,
    pub holdings: usize,
    pub sections_resolved: usize,
    pub sections_unresolved: usize,
    pub rows_by_kind: BTreeMap<RowKind, usize>,
}

impl IngestionStats {
    pub fn record_row(&mut self, kind: RowKind) {
        *self.rows_by_kind.entry(kind).or_insert(0) += 1;
    }

    pub fn rows_of(&self, kind: RowKind) -> usize {
        self.rows_by_kind.get(&kind).copied().unwrap_or(0)
    }
}

/// A non-empty row no transition consumed, kept for manual review.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SkippedRow {
    pub sheet: String,
    pub row: usize,
    pub cells: RawRow,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IngestionReport {
    pub outcome: IngestionOutcome,
    /// Provisional upload id; `None` when nothing was committed.
    pub upload_id: Option<i64>,
    /// Final upload name when committed.
    pub file_name: Option<String>,
    pub stats: IngestionStats,
    /// Every event raised for the file, warnings and errors included.
    pub warnings: Vec<IngestionEvent>,
    pub skipped_rows: Vec<SkippedRow>,
}
