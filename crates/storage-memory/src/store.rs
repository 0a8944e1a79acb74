use std::collections::HashSet;
use std::sync::{Arc, Mutex, RwLock};

use async_trait::async_trait;
use chrono::Utc;
use log::{debug, warn};
use rust_decimal::Decimal;
use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};

use navfolio_core::disclosures::{
    DisclosureStoreTrait, DisclosureTransaction, Holding, Industry, InstrumentHeader,
    InstrumentMaster, NewHolding, NewInstrument, NewSnapshot, NewUpload, Snapshot, Upload,
};
use navfolio_core::errors::Result;
use navfolio_core::reference::{Amc, DisclosureType, Fund, ReferenceDataRepositoryTrait};

use crate::errors::StorageError;
use crate::tables::{DisclosureTables, ReferenceTables};

/// Operations that can be made to fail once, for exercising rollback paths.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FailPoint {
    CreateUpload,
    CreateSnapshot,
    CreateHolding,
    RenameUpload,
    Commit,
}

/// In-memory disclosure store.
///
/// All writes go through a [`MemoryTransaction`], and only one transaction can be open at a
/// time: `begin` waits for the previous one to commit or roll back. Concurrent files are
/// therefore serialized, and get-or-create lookups never race.
#[derive(Clone, Default)]
pub struct MemoryStore {
    reference: Arc<RwLock<ReferenceTables>>,
    tables: Arc<AsyncMutex<DisclosureTables>>,
    fail_points: Arc<Mutex<HashSet<FailPoint>>>,
}

fn poisoned<E: std::fmt::Display>(err: E) -> StorageError {
    StorageError::LockPoisoned(err.to_string())
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_amc(&self, name: &str) -> Result<Amc> {
        let mut reference = self.reference.write().map_err(poisoned)?;
        let amc = Amc {
            id: reference.amcs.len() as i64 + 1,
            name: name.to_string(),
        };
        reference.amcs.push(amc.clone());
        Ok(amc)
    }

    pub fn add_disclosure_type(&self, type_name: &str) -> Result<DisclosureType> {
        let mut reference = self.reference.write().map_err(poisoned)?;
        let disclosure_type = DisclosureType {
            id: reference.disclosure_types.len() as i64 + 1,
            type_name: type_name.to_string(),
        };
        reference.disclosure_types.push(disclosure_type.clone());
        Ok(disclosure_type)
    }

    pub fn add_fund(&self, amc_id: i64, canonical_name: &str) -> Result<Fund> {
        let mut reference = self.reference.write().map_err(poisoned)?;
        if !reference.amcs.iter().any(|a| a.id == amc_id) {
            return Err(StorageError::NotFound(format!("AMC {}", amc_id)).into());
        }
        let fund = Fund {
            id: reference.funds.len() as i64 + 1,
            amc_id,
            canonical_name: canonical_name.to_string(),
        };
        reference.funds.push(fund.clone());
        Ok(fund)
    }

    /// Sections are maintained outside ingestion; this is how they get in.
    pub async fn add_instrument_header(&self, name: &str) -> InstrumentHeader {
        let mut tables = self.tables.lock().await;
        if let Some(header) = tables.instrument_headers.iter().find(|h| h.name == name) {
            return header.clone();
        }
        let header = InstrumentHeader {
            id: tables.next_instrument_header_id(),
            name: name.to_string(),
        };
        tables.instrument_headers.push(header.clone());
        header
    }

    /// Arms `point`: the next call to that operation fails.
    pub fn fail_next(&self, point: FailPoint) -> Result<()> {
        self.fail_points.lock().map_err(poisoned)?.insert(point);
        Ok(())
    }

    pub async fn uploads(&self) -> Vec<Upload> {
        self.tables.lock().await.uploads.clone()
    }

    pub async fn snapshots(&self) -> Vec<Snapshot> {
        self.tables.lock().await.snapshots.clone()
    }

    pub async fn instrument_headers(&self) -> Vec<InstrumentHeader> {
        self.tables.lock().await.instrument_headers.clone()
    }

    pub async fn industries(&self) -> Vec<Industry> {
        self.tables.lock().await.industries.clone()
    }

    pub async fn instruments(&self) -> Vec<InstrumentMaster> {
        self.tables.lock().await.instruments.clone()
    }

    pub async fn holdings(&self) -> Vec<Holding> {
        self.tables.lock().await.holdings.clone()
    }
}

#[async_trait]
impl ReferenceDataRepositoryTrait for MemoryStore {
    async fn get_amc(&self, amc_id: i64) -> Result<Option<Amc>> {
        let reference = self.reference.read().map_err(poisoned)?;
        Ok(reference.amcs.iter().find(|a| a.id == amc_id).cloned())
    }

    async fn get_disclosure_type(&self, disclosure_type_id: i64) -> Result<Option<DisclosureType>> {
        let reference = self.reference.read().map_err(poisoned)?;
        Ok(reference
            .disclosure_types
            .iter()
            .find(|t| t.id == disclosure_type_id)
            .cloned())
    }

    async fn list_funds(&self, amc_id: i64) -> Result<Vec<Fund>> {
        let reference = self.reference.read().map_err(poisoned)?;
        Ok(reference
            .funds
            .iter()
            .filter(|f| f.amc_id == amc_id)
            .cloned()
            .collect())
    }
}

#[async_trait]
impl DisclosureStoreTrait for MemoryStore {
    async fn begin(&self) -> Result<Box<dyn DisclosureTransaction>> {
        let guard = self.tables.clone().lock_owned().await;
        let checkpoint = DisclosureTables::clone(&guard);
        debug!("Transaction started");
        Ok(Box::new(MemoryTransaction {
            guard,
            checkpoint: Some(checkpoint),
            fail_points: self.fail_points.clone(),
        }))
    }
}

/// Exclusive handle on the tables. Uncommitted changes are undone when it is dropped.
pub struct MemoryTransaction {
    guard: OwnedMutexGuard<DisclosureTables>,
    checkpoint: Option<DisclosureTables>,
    fail_points: Arc<Mutex<HashSet<FailPoint>>>,
}

impl MemoryTransaction {
    fn check(&self, point: FailPoint) -> Result<()> {
        let mut armed = self.fail_points.lock().map_err(poisoned)?;
        if armed.remove(&point) {
            let reason = format!("{:?}", point);
            return Err(match point {
                FailPoint::Commit => StorageError::CommitRejected(reason),
                _ => StorageError::Injected(reason),
            }
            .into());
        }
        Ok(())
    }
}

impl Drop for MemoryTransaction {
    fn drop(&mut self) {
        if let Some(checkpoint) = self.checkpoint.take() {
            debug!("Transaction rolled back");
            *self.guard = checkpoint;
        }
    }
}

#[async_trait]
impl DisclosureTransaction for MemoryTransaction {
    async fn create_upload(&mut self, new_upload: NewUpload) -> Result<Upload> {
        self.check(FailPoint::CreateUpload)?;
        let upload = Upload {
            id: self.guard.next_upload_id(),
            file_name: new_upload.file_name,
            disclosure_type_id: new_upload.disclosure_type_id,
            created_at: Utc::now().naive_utc(),
        };
        self.guard.uploads.push(upload.clone());
        Ok(upload)
    }

    async fn upload_name_exists(&mut self, file_name: &str, exclude_upload_id: i64) -> Result<bool> {
        Ok(self
            .guard
            .uploads
            .iter()
            .any(|u| u.id != exclude_upload_id && u.file_name == file_name))
    }

    async fn rename_upload(&mut self, upload_id: i64, file_name: &str) -> Result<Upload> {
        self.check(FailPoint::RenameUpload)?;
        if self
            .guard
            .uploads
            .iter()
            .any(|u| u.id != upload_id && u.file_name == file_name)
        {
            warn!("Upload name '{}' is already taken; overwriting", file_name);
        }
        let upload = self
            .guard
            .uploads
            .iter_mut()
            .find(|u| u.id == upload_id)
            .ok_or_else(|| StorageError::NotFound(format!("upload {}", upload_id)))?;
        upload.file_name = file_name.to_string();
        Ok(upload.clone())
    }

    async fn create_snapshot(&mut self, new_snapshot: NewSnapshot) -> Result<Snapshot> {
        self.check(FailPoint::CreateSnapshot)?;
        if !self.guard.uploads.iter().any(|u| u.id == new_snapshot.upload_id) {
            return Err(StorageError::NotFound(format!("upload {}", new_snapshot.upload_id)).into());
        }
        let snapshot = Snapshot {
            id: self.guard.next_snapshot_id(),
            fund_id: new_snapshot.fund_id,
            upload_id: new_snapshot.upload_id,
            as_on_date: new_snapshot.as_on_date,
            sheet_name: new_snapshot.sheet_name,
            grand_total: None,
        };
        self.guard.snapshots.push(snapshot.clone());
        Ok(snapshot)
    }

    async fn set_snapshot_grand_total(&mut self, snapshot_id: i64, grand_total: Decimal) -> Result<Snapshot> {
        let snapshot = self
            .guard
            .snapshots
            .iter_mut()
            .find(|s| s.id == snapshot_id)
            .ok_or_else(|| StorageError::NotFound(format!("snapshot {}", snapshot_id)))?;
        snapshot.grand_total = Some(grand_total);
        Ok(snapshot.clone())
    }

    async fn find_instrument_header(&mut self, name: &str) -> Result<Option<InstrumentHeader>> {
        Ok(self
            .guard
            .instrument_headers
            .iter()
            .find(|h| h.name == name)
            .cloned())
    }

    async fn get_or_create_industry(&mut self, name: &str) -> Result<Industry> {
        if let Some(industry) = self.guard.industries.iter().find(|i| i.name == name) {
            return Ok(industry.clone());
        }
        let industry = Industry {
            id: self.guard.next_industry_id(),
            name: name.to_string(),
        };
        self.guard.industries.push(industry.clone());
        Ok(industry)
    }

    async fn get_or_create_instrument(&mut self, new_instrument: NewInstrument) -> Result<InstrumentMaster> {
        if let Some(instrument) = self
            .guard
            .instruments
            .iter()
            .find(|i| i.isin == new_instrument.isin && i.name == new_instrument.name)
        {
            return Ok(instrument.clone());
        }
        let instrument = InstrumentMaster {
            id: self.guard.next_instrument_id(),
            name: new_instrument.name,
            isin: new_instrument.isin,
            industry_id: new_instrument.industry_id,
            rating: new_instrument.rating,
        };
        self.guard.instruments.push(instrument.clone());
        Ok(instrument)
    }

    async fn create_holding(&mut self, new_holding: NewHolding) -> Result<Holding> {
        self.check(FailPoint::CreateHolding)?;
        let holding = Holding {
            id: self.guard.next_holding_id(),
            snapshot_id: new_holding.snapshot_id,
            header_id: new_holding.header_id,
            instrument_id: new_holding.instrument_id,
            qty: new_holding.qty,
            market_value: new_holding.market_value,
            pct_of_net_assets: new_holding.pct_of_net_assets,
            ytm: new_holding.ytm,
            ytc: new_holding.ytc,
            raw_row: new_holding.raw_row,
        };
        self.guard.holdings.push(holding.clone());
        Ok(holding)
    }

    async fn commit(self: Box<Self>) -> Result<()> {
        // A failed commit drops the transaction, which rolls it back.
        self.check(FailPoint::Commit)?;
        let mut this = self;
        this.checkpoint = None;
        debug!("Transaction committed");
        Ok(())
    }

    async fn rollback(self: Box<Self>) -> Result<()> {
        drop(self);
        Ok(())
    }
}
