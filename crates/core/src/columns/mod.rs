//! Header-row column role mapping.

mod column_mapper;

pub use column_mapper::{map_columns, ColumnMap, ColumnRole};
