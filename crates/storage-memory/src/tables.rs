use navfolio_core::disclosures::{
    Holding, Industry, InstrumentHeader, InstrumentMaster, Snapshot, Upload,
};
use navfolio_core::reference::{Amc, DisclosureType, Fund};

/// Reference data. Read-only for the pipeline, so it lives outside the transactional tables.
#[derive(Debug, Clone, Default)]
pub(crate) struct ReferenceTables {
    pub amcs: Vec<Amc>,
    pub disclosure_types: Vec<DisclosureType>,
    pub funds: Vec<Fund>,
}

/// Tables written during ingestion. Ids are assigned from per-table sequences that are
/// restored on rollback along with the rows.
#[derive(Debug, Clone, Default)]
pub(crate) struct DisclosureTables {
    pub uploads: Vec<Upload>,
    pub snapshots: Vec<Snapshot>,
    pub instrument_headers: Vec<InstrumentHeader>,
    pub industries: Vec<Industry>,
    pub instruments: Vec<InstrumentMaster>,
    pub holdings: Vec<Holding>,
    sequences: Sequences,
}

#[derive(Debug, Clone, Default)]
struct Sequences {
    upload: i64,
    snapshot: i64,
    instrument_header: i64,
    industry: i64,
    instrument: i64,
    holding: i64,
}

impl DisclosureTables {
    pub fn next_upload_id(&mut self) -> i64 {
        self.sequences.upload += 1;
        self.sequences.upload
    }

    pub fn next_snapshot_id(&mut self) -> i64 {
        self.sequences.snapshot += 1;
        self.sequences.snapshot
    }

    pub fn next_instrument_header_id(&mut self) -> i64 {
        self.sequences.instrument_header += 1;
        self.sequences.instrument_header
    }

    pub fn next_industry_id(&mut self) -> i64 {
        self.sequences.industry += 1;
        self.sequences.industry
    }

    pub fn next_instrument_id(&mut self) -> i64 {
        self.sequences.instrument += 1;
        self.sequences.instrument
    }

    pub fn next_holding_id(&mut self) -> i64 {
        self.sequences.holding += 1;
        self.sequences.holding
    }
}
