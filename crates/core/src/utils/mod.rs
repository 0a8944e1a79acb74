//! Pure text helpers shared by the classifier, the column mapper and the fund resolver.

pub mod date_parser;
pub mod name_normalizer;
pub mod number_parser;

pub use date_parser::{extract_date_text, find_date, parse_date_fragment};
pub use name_normalizer::normalize_name;
pub use number_parser::{is_numeric_cell, parse_number};
