//! Decoded workbook input.
//!
//! Decoding spreadsheet formats is left to the caller; the pipeline only needs sheets in
//! document order and display-formatted cells in row order.

use std::collections::VecDeque;

use crate::classifier::RawRow;
use crate::errors::Result;

/// One sheet: a name and a lazily produced sequence of rows.
pub trait SheetSource: Send {
    fn name(&self) -> &str;

    /// Next row in source order, `None` once the sheet is exhausted.
    fn next_row(&mut self) -> Result<Option<RawRow>>;
}

/// Sheets of one document, in document order.
pub trait WorkbookSource: Send {
    fn next_sheet(&mut self) -> Result<Option<Box<dyn SheetSource>>>;
}

#[derive(Debug, Clone, Default)]
pub struct InMemorySheet {
    name: String,
    rows: VecDeque<RawRow>,
}

impl InMemorySheet {
    pub fn new(name: impl Into<String>, rows: Vec<RawRow>) -> Self {
        Self {
            name: name.into(),
            rows: rows.into(),
        }
    }

    /// Builds a sheet from string cells, treating blank strings as empty cells.
    pub fn from_strings<R, C>(name: impl Into<String>, rows: R) -> Self
    where
        R: IntoIterator<Item = C>,
        C: IntoIterator,
        C::Item: AsRef<str>,
    {
        let rows = rows
            .into_iter()
            .map(|row| {
                row.into_iter()
                    .map(|cell| {
                        let cell = cell.as_ref();
                        (!cell.trim().is_empty()).then(|| cell.to_string())
                    })
                    .collect()
            })
            .collect();
        Self::new(name, rows)
    }
}

impl SheetSource for InMemorySheet {
    fn name(&self) -> &str {
        &self.name
    }

    fn next_row(&mut self) -> Result<Option<RawRow>> {
        Ok(self.rows.pop_front())
    }
}

/// Workbook for callers that already hold decoded cells.
#[derive(Debug, Clone, Default)]
pub struct InMemoryWorkbook {
    sheets: VecDeque<InMemorySheet>,
}

impl InMemoryWorkbook {
    pub fn new(sheets: Vec<InMemorySheet>) -> Self {
        Self {
            sheets: sheets.into(),
        }
    }

    pub fn with_sheet(mut self, sheet: InMemorySheet) -> Self {
        self.sheets.push_back(sheet);
        self
    }
}

impl WorkbookSource for InMemoryWorkbook {
    fn next_sheet(&mut self) -> Result<Option<Box<dyn SheetSource>>> {
        Ok(self
            .sheets
            .pop_front()
            .map(|sheet| Box::new(sheet) as Box<dyn SheetSource>))
    }
}
