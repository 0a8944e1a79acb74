//! Semantic classification of raw sheet rows.

mod classifier_model;
mod row_classifier;

pub use classifier_model::{ClassifiedRow, RawRow, RowKind};
pub use row_classifier::{classify_row, is_data_row, RowClassifier};
