use async_trait::async_trait;
use rust_decimal::Decimal;

use super::disclosures_model::*;
use crate::errors::Result;

/// Entry point into the storage collaborator for one file's writes.
#[async_trait]
pub trait DisclosureStoreTrait: Send + Sync {
    /// Opens a transaction. Everything written through it is discarded unless it is committed.
    async fn begin(&self) -> Result<Box<dyn DisclosureTransaction>>;
}

/// Writes and lookups performed inside one ingestion transaction.
///
/// Dropping a transaction without calling `commit` must behave like `rollback`.
#[async_trait]
pub trait DisclosureTransaction: Send {
    async fn create_upload(&mut self, new_upload: NewUpload) -> Result<Upload>;

    /// True when an upload other than `exclude_upload_id` already carries `file_name`.
    async fn upload_name_exists(&mut self, file_name: &str, exclude_upload_id: i64) -> Result<bool>;

    async fn rename_upload(&mut self, upload_id: i64, file_name: &str) -> Result<Upload>;

    async fn create_snapshot(&mut self, new_snapshot: NewSnapshot) -> Result<Snapshot>;

    async fn set_snapshot_grand_total(&mut self, snapshot_id: i64, grand_total: Decimal) -> Result<Snapshot>;

    /// Exact-name lookup. Sections are never created by the pipeline.
    async fn find_instrument_header(&mut self, name: &str) -> Result<Option<InstrumentHeader>>;

    /// Returns the industry with exactly this name, inserting it if absent.
    async fn get_or_create_industry(&mut self, name: &str) -> Result<Industry>;

    /// Returns the instrument with exactly this `(isin, name)` pair, inserting it if absent.
    async fn get_or_create_instrument(&mut self, new_instrument: NewInstrument) -> Result<InstrumentMaster>;

    async fn create_holding(&mut self, new_holding: NewHolding) -> Result<Holding>;

    async fn commit(self: Box<Self>) -> Result<()>;

    async fn rollback(self: Box<Self>) -> Result<()>;
}
