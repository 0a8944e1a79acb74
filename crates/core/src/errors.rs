//! Core error types for the disclosure ingestion pipeline.
//!
//! This module defines database-agnostic error types. Storage-specific errors
//! are converted to these types by the storage layer.

use thiserror::Error;

/// Type alias for Result using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Root error type for the ingestion pipeline.
///
/// Classification and column mapping never produce these; they degrade to
/// `Skip` or absent values. Only storage, file-store and reference-data
/// failures surface here and abort the current file.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Database operation failed: {0}")]
    Database(#[from] DatabaseError),

    #[error("Ingestion failed: {0}")]
    Ingestion(#[from] IngestionError),

    #[error("Input validation failed: {0}")]
    Validation(#[from] ValidationError),

    #[error("Invalid configuration value: {0}")]
    InvalidConfigValue(String),
}

/// Database-agnostic error type for storage operations.
///
/// This enum uses `String` for all error details, allowing the storage layer
/// to convert its own errors into this format.
#[derive(Error, Debug)]
pub enum DatabaseError {
    /// A query or write failed to execute.
    #[error("Database query failed: {0}")]
    QueryFailed(String),

    /// The requested record was not found.
    #[error("Record not found: {0}")]
    NotFound(String),

    /// A transaction could not be started, committed or rolled back.
    #[error("Transaction failed: {0}")]
    TransactionFailed(String),

    /// Internal/unexpected database error.
    #[error("Internal database error: {0}")]
    Internal(String),
}

/// File-level failures raised by the ingestion coordinator and its collaborators.
#[derive(Error, Debug)]
pub enum IngestionError {
    #[error("AMC {0} does not exist")]
    AmcNotFound(i64),

    #[error("Disclosure type {0} does not exist")]
    DisclosureTypeNotFound(i64),

    #[error("Source workbook could not be read: {0}")]
    SourceUnavailable(String),

    #[error("Source file operation failed: {0}")]
    FileStore(String),

    #[error("No as-on date was found in any sheet")]
    MissingAsOnDate,
}

/// Input that could not be turned into a stored value.
#[derive(Error, Debug)]
pub enum ValidationError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl Error {
    /// A short message safe to show to whoever uploaded the file.
    ///
    /// Storage failures are reported generically; the detailed error goes to the log.
    pub fn user_message(&self) -> String {
        match self {
            Error::Database(_) => "A storage operation failed while ingesting the file".to_string(),
            Error::Ingestion(e) => e.to_string(),
            Error::Validation(e) => e.to_string(),
            Error::InvalidConfigValue(e) => format!("Invalid configuration: {}", e),
        }
    }
}

// === From implementations for common error types ===

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Validation(ValidationError::InvalidInput(err.to_string()))
    }
}
