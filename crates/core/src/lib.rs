//! Navfolio Core - Portfolio disclosure ingestion.
//!
//! This crate turns the sheets of a mutual-fund portfolio disclosure into
//! snapshots and holdings. It is storage-agnostic and defines the traits the
//! storage crates implement (see `navfolio-storage-memory`).

pub mod classifier;
pub mod columns;
pub mod constants;
pub mod disclosures;
pub mod errors;
pub mod events;
pub mod funds;
pub mod ingestion;
pub mod reference;
pub mod utils;

pub use classifier::{ClassifiedRow, RawRow, RowClassifier, RowKind};
pub use ingestion::{
    IngestionConfig, IngestionOutcome, IngestionReport, IngestionRequest, IngestionService,
    IngestionServiceTrait,
};

// Re-export error types
pub use errors::Error;
pub use errors::Result;
