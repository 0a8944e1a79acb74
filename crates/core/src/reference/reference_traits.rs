use async_trait::async_trait;

use super::reference_model::{Amc, DisclosureType, Fund};
use crate::errors::Result;

/// Read access to reference data owned by the storage collaborator.
#[async_trait]
pub trait ReferenceDataRepositoryTrait: Send + Sync {
    async fn get_amc(&self, amc_id: i64) -> Result<Option<Amc>>;
    async fn get_disclosure_type(&self, disclosure_type_id: i64) -> Result<Option<DisclosureType>>;
    /// Fund catalog of one AMC, in storage order.
    async fn list_funds(&self, amc_id: i64) -> Result<Vec<Fund>>;
}
