//! In-memory storage implementation for Navfolio.
//!
//! Implements the reference-data and disclosure-store traits defined in
//! `navfolio-core`. Transactions take exclusive ownership of the tables until
//! they commit or roll back, which makes this store the single writer for
//! every ingestion running against it.
//!
//! ```text
//!   IngestionService (core)
//!          │ begin / commit / rollback
//!          ▼
//!   MemoryStore ── MemoryTransaction (one at a time)
//! ```

pub mod errors;
mod store;
mod tables;

pub use errors::StorageError;
pub use store::{FailPoint, MemoryStore, MemoryTransaction};
