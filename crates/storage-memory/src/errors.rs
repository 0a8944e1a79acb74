//! Storage-specific error types for the in-memory store.

use navfolio_core::errors::{DatabaseError, Error};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Record not found: {0}")]
    NotFound(String),

    #[error("Lock poisoned: {0}")]
    LockPoisoned(String),

    /// Raised by a fail point armed with `MemoryStore::fail_next`.
    #[error("Injected failure at {0}")]
    Injected(String),

    /// Raised when an armed commit fail point fires.
    #[error("Commit rejected at {0}")]
    CommitRejected(String),
}

impl From<StorageError> for Error {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::NotFound(e) => Error::Database(DatabaseError::NotFound(e)),
            StorageError::LockPoisoned(e) => Error::Database(DatabaseError::Internal(e)),
            StorageError::Injected(e) => Error::Database(DatabaseError::QueryFailed(e)),
            StorageError::CommitRejected(e) => Error::Database(DatabaseError::TransactionFailed(e)),
        }
    }
}
