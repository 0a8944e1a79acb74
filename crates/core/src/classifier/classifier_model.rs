use serde::{Deserialize, Serialize};

/// One source row: display-formatted cells in column order, `None` for blank cells.
pub type RawRow = Vec<Option<String>>;

/// Semantic role of a row within a disclosure sheet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RowKind {
    Empty,
    FundBanner,
    AsOnDate,
    GrandTotal,
    Skip,
    Data,
    Section,
    Header,
}

/// Classification result. `value` carries the extracted text for banner, date and section rows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassifiedRow {
    pub kind: RowKind,
    pub value: Option<String>,
}

impl ClassifiedRow {
    pub fn new(kind: RowKind) -> Self {
        Self { kind, value: None }
    }

    pub fn with_value(kind: RowKind, value: impl Into<String>) -> Self {
        Self {
            kind,
            value: Some(value.into()),
        }
    }
}
