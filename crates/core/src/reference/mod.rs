//! Reference data the pipeline reads but never creates: AMCs, disclosure types and funds.

mod reference_model;
mod reference_traits;

pub use reference_model::{Amc, DisclosureType, Fund};
pub use reference_traits::ReferenceDataRepositoryTrait;
