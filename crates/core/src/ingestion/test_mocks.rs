//! Hand-written collaborators shared by the ingestion tests.

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::NaiveDateTime;
use rust_decimal::Decimal;

use crate::disclosures::*;
use crate::errors::{DatabaseError, Result};
use crate::ingestion::SourceFileStoreTrait;
use crate::reference::{Amc, DisclosureType, Fund, ReferenceDataRepositoryTrait};

pub fn row(cells: &[&str]) -> Vec<Option<String>> {
    cells
        .iter()
        .map(|c| if c.is_empty() { None } else { Some(c.to_string()) })
        .collect()
}

pub fn example_fund() -> Fund {
    Fund {
        id: 100,
        amc_id: 1,
        canonical_name: "Example Fund".to_string(),
    }
}

pub fn example_bond_fund() -> Fund {
    Fund {
        id: 101,
        amc_id: 1,
        canonical_name: "Example Bond Plus Fund".to_string(),
    }
}

// --- Mock reference data ---
#[derive(Clone)]
pub struct MockReferenceData {
    pub amcs: Vec<Amc>,
    pub disclosure_types: Vec<DisclosureType>,
    pub funds: Vec<Fund>,
}

impl MockReferenceData {
    pub fn new() -> Self {
        Self {
            amcs: vec![Amc {
                id: 1,
                name: "Example Fund".to_string(),
            }],
            disclosure_types: vec![DisclosureType {
                id: 7,
                type_name: "Monthly".to_string(),
            }],
            funds: vec![example_fund(), example_bond_fund()],
        }
    }
}

#[async_trait]
impl ReferenceDataRepositoryTrait for MockReferenceData {
    async fn get_amc(&self, amc_id: i64) -> Result<Option<Amc>> {
        Ok(self.amcs.iter().find(|a| a.id == amc_id).cloned())
    }

    async fn get_disclosure_type(&self, disclosure_type_id: i64) -> Result<Option<DisclosureType>> {
        Ok(self
            .disclosure_types
            .iter()
            .find(|t| t.id == disclosure_type_id)
            .cloned())
    }

    async fn list_funds(&self, amc_id: i64) -> Result<Vec<Fund>> {
        Ok(self
            .funds
            .iter()
            .filter(|f| f.amc_id == amc_id)
            .cloned()
            .collect())
    }
}

// --- Mock store ---
/// Records every write; there is no isolation, only commit/rollback bookkeeping.
#[derive(Default)]
pub struct MockTables {
    pub uploads: Vec<Upload>,
    pub existing_upload_names: Vec<String>,
    pub snapshots: Vec<Snapshot>,
    pub headers: Vec<InstrumentHeader>,
    pub industries: Vec<Industry>,
    pub instruments: Vec<InstrumentMaster>,
    pub holdings: Vec<Holding>,
    pub committed: bool,
    pub rolled_back: bool,
    pub fail_create_holding: bool,
    pub fail_commit: bool,
}

#[derive(Clone, Default)]
pub struct MockDisclosureStore {
    pub tables: Arc<Mutex<MockTables>>,
}

impl MockDisclosureStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_header(self, id: i64, name: &str) -> Self {
        self.tables.lock().unwrap().headers.push(InstrumentHeader {
            id,
            name: name.to_string(),
        });
        self
    }

    pub fn with_existing_upload(self, name: &str) -> Self {
        self.tables
            .lock()
            .unwrap()
            .existing_upload_names
            .push(name.to_string());
        self
    }

    pub fn transaction(&self) -> MockTransaction {
        MockTransaction {
            tables: self.tables.clone(),
        }
    }
}

#[async_trait]
impl DisclosureStoreTrait for MockDisclosureStore {
    async fn begin(&self) -> Result<Box<dyn DisclosureTransaction>> {
        Ok(Box::new(self.transaction()))
    }
}

pub struct MockTransaction {
    tables: Arc<Mutex<MockTables>>,
}

fn created_at() -> NaiveDateTime {
    chrono::NaiveDate::from_ymd_opt(2025, 12, 1)
        .unwrap()
        .and_hms_opt(9, 0, 0)
        .unwrap()
}

#[async_trait]
impl DisclosureTransaction for MockTransaction {
    async fn create_upload(&mut self, new_upload: NewUpload) -> Result<Upload> {
        let mut tables = self.tables.lock().unwrap();
        let upload = Upload {
            id: tables.uploads.len() as i64 + 1,
            file_name: new_upload.file_name,
            disclosure_type_id: new_upload.disclosure_type_id,
            created_at: created_at(),
        };
        tables.uploads.push(upload.clone());
        Ok(upload)
    }

    async fn upload_name_exists(&mut self, file_name: &str, exclude_upload_id: i64) -> Result<bool> {
        let tables = self.tables.lock().unwrap();
        Ok(tables.existing_upload_names.iter().any(|n| n == file_name)
            || tables
                .uploads
                .iter()
                .any(|u| u.id != exclude_upload_id && u.file_name == file_name))
    }

    async fn rename_upload(&mut self, upload_id: i64, file_name: &str) -> Result<Upload> {
        let mut tables = self.tables.lock().unwrap();
        let upload = tables
            .uploads
            .iter_mut()
            .find(|u| u.id == upload_id)
            .ok_or_else(|| DatabaseError::NotFound(format!("upload {}", upload_id)))?;
        upload.file_name = file_name.to_string();
        Ok(upload.clone())
    }

    async fn create_snapshot(&mut self, new_snapshot: NewSnapshot) -> Result<Snapshot> {
        let mut tables = self.tables.lock().unwrap();
        let snapshot = Snapshot {
            id: tables.snapshots.len() as i64 + 1,
            fund_id: new_snapshot.fund_id,
            upload_id: new_snapshot.upload_id,
            as_on_date: new_snapshot.as_on_date,
            sheet_name: new_snapshot.sheet_name,
            grand_total: None,
        };
        tables.snapshots.push(snapshot.clone());
        Ok(snapshot)
    }

    async fn set_snapshot_grand_total(&mut self, snapshot_id: i64, grand_total: Decimal) -> Result<Snapshot> {
        let mut tables = self.tables.lock().unwrap();
        let snapshot = tables
            .snapshots
            .iter_mut()
            .find(|s| s.id == snapshot_id)
            .ok_or_else(|| DatabaseError::NotFound(format!("snapshot {}", snapshot_id)))?;
        snapshot.grand_total = Some(grand_total);
        Ok(snapshot.clone())
    }

    async fn find_instrument_header(&mut self, name: &str) -> Result<Option<InstrumentHeader>> {
        let tables = self.tables.lock().unwrap();
        Ok(tables.headers.iter().find(|h| h.name == name).cloned())
    }

    async fn get_or_create_industry(&mut self, name: &str) -> Result<Industry> {
        let mut tables = self.tables.lock().unwrap();
        if let Some(industry) = tables.industries.iter().find(|i| i.name == name) {
            return Ok(industry.clone());
        }
        let industry = Industry {
            id: tables.industries.len() as i64 + 1,
            name: name.to_string(),
        };
        tables.industries.push(industry.clone());
        Ok(industry)
    }

    async fn get_or_create_instrument(&mut self, new_instrument: NewInstrument) -> Result<InstrumentMaster> {
        let mut tables = self.tables.lock().unwrap();
        if let Some(instrument) = tables
            .instruments
            .iter()
            .find(|i| i.isin == new_instrument.isin && i.name == new_instrument.name)
        {
            return Ok(instrument.clone());
        }
        let instrument = InstrumentMaster {
            id: tables.instruments.len() as i64 + 1,
            name: new_instrument.name,
            isin: new_instrument.isin,
            industry_id: new_instrument.industry_id,
            rating: new_instrument.rating,
        };
        tables.instruments.push(instrument.clone());
        Ok(instrument)
    }

    async fn create_holding(&mut self, new_holding: NewHolding) -> Result<Holding> {
        let mut tables = self.tables.lock().unwrap();
        if tables.fail_create_holding {
            return Err(DatabaseError::QueryFailed("disk I/O error".to_string()).into());
        }
        let holding = Holding {
            id: tables.holdings.len() as i64 + 1,
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
        tables.holdings.push(holding.clone());
        Ok(holding)
    }

    async fn commit(self: Box<Self>) -> Result<()> {
        let mut tables = self.tables.lock().unwrap();
        if tables.fail_commit {
            return Err(DatabaseError::TransactionFailed("commit refused".to_string()).into());
        }
        tables.committed = true;
        Ok(())
    }

    async fn rollback(self: Box<Self>) -> Result<()> {
        self.tables.lock().unwrap().rolled_back = true;
        Ok(())
    }
}

// --- Mock file store ---
#[derive(Clone, Default)]
pub struct MockSourceFileStore {
    pub promoted: Arc<Mutex<Vec<(PathBuf, String)>>>,
    pub discarded: Arc<Mutex<Vec<PathBuf>>>,
    pub fail_promote: bool,
}

#[async_trait]
impl SourceFileStoreTrait for MockSourceFileStore {
    async fn promote(&self, source: &Path, canonical_name: &str) -> Result<PathBuf> {
        if self.fail_promote {
            return Err(crate::errors::IngestionError::FileStore("read-only volume".to_string()).into());
        }
        self.promoted
            .lock()
            .unwrap()
            .push((source.to_path_buf(), canonical_name.to_string()));
        Ok(PathBuf::from("/uploads").join(canonical_name))
    }

    async fn discard(&self, source: &Path) -> Result<()> {
        self.discarded.lock().unwrap().push(source.to_path_buf());
        Ok(())
    }
}
