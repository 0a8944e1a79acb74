//! Disclosure entities written during ingestion and the transactional store contract.

mod disclosures_model;
mod disclosures_traits;

pub use disclosures_model::{
    Holding, Industry, InstrumentHeader, InstrumentMaster, NewHolding, NewInstrument, NewSnapshot,
    NewUpload, Snapshot, Upload,
};
pub use disclosures_traits::{DisclosureStoreTrait, DisclosureTransaction};
