//! Ingestion event types.

use serde::{Deserialize, Serialize};

/// How serious an ingestion event is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum EventSeverity {
    Info,
    /// Non-fatal; the row or sheet degraded to a conservative default.
    Warning,
    /// The file was kept but something the caller relies on is missing.
    Error,
    /// The file's transaction was rolled back.
    Abort,
}

/// A human-readable event tied to a position in the source document.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IngestionEvent {
    pub severity: EventSeverity,
    pub sheet: Option<String>,
    /// Zero-based row index within the sheet.
    pub row: Option<usize>,
    pub message: String,
}

impl IngestionEvent {
    pub fn new(severity: EventSeverity, message: impl Into<String>) -> Self {
        Self {
            severity,
            sheet: None,
            row: None,
            message: message.into(),
        }
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self::new(EventSeverity::Warning, message)
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::new(EventSeverity::Error, message)
    }

    pub fn abort(message: impl Into<String>) -> Self {
        Self::new(EventSeverity::Abort, message)
    }

    pub fn at(mut self, sheet: &str, row: Option<usize>) -> Self {
        self.sheet = Some(sheet.to_string());
        self.row = row;
        self
    }
}

impl std::fmt::Display for IngestionEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match (&self.sheet, self.row) {
            (Some(sheet), Some(row)) => write!(f, "[{}:{}] {}", sheet, row + 1, self.message),
            (Some(sheet), None) => write!(f, "[{}] {}", sheet, self.message),
            _ => write!(f, "{}", self.message),
        }
    }
}
