//! File ingestion: the per-sheet state machine and the per-file coordinator.

mod canonical_name;
mod ingestion_config;
mod ingestion_model;
mod ingestion_service;
mod sheet_ingestor;
mod source_file_store;
mod workbook;

#[cfg(test)]
mod test_mocks;


#[cfg(test)]
mod ingestion_service_tests;

pub use canonical_name::canonical_file_name;
pub use ingestion_config::{
    IngestionConfig, MissingDatePolicy, ENV_EXTRA_SECTION_LABELS, ENV_MISSING_DATE_POLICY,
    ENV_RETAIN_SKIPPED_ROWS, ENV_UPLOADS_DIR,
};
pub use ingestion_model::{
    IngestionOutcome, IngestionReport, IngestionRequest, IngestionStats, SkippedRow,
};
pub use ingestion_service::{IngestionService, IngestionServiceTrait};
pub use sheet_ingestor::{FileContext, FileProgress, RowFlow, SheetIngestor, SheetState};
pub use source_file_store::{LocalSourceFileStore, SourceFileStoreTrait};
pub use workbook::{InMemorySheet, InMemoryWorkbook, SheetSource, WorkbookSource};
