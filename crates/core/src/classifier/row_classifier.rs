//! Row classifier.
//!
//! Rows are matched against an ordered chain of rules; the first rule that
//! fires decides the row's kind. Order matters: footer totals must win over
//! the data heuristic, and the data heuristic must win over section and
//! header keywords. Rows no rule accepts are `Skip`.

use std::collections::HashSet;

use super::classifier_model::{ClassifiedRow, RowKind};
use crate::constants::{
    AS_ON_MARKERS, DATA_MIN_CELLS, DATA_MIN_NUMERIC_CELLS, FUND_BANNER_MAX_CELLS,
    GRAND_TOTAL_MARKER, HEADER_KEYWORDS, HEADER_MIN_MATCHES, INSTRUMENT_NAME_MIN_LEN,
    SECTION_LABELS, STOP_WORDS,
};
use crate::utils::{extract_date_text, is_numeric_cell, normalize_name};

/// Non-empty cells of a row plus the joined text the rules match against.
struct RowView<'a> {
    cleaned: Vec<&'a str>,
    text: String,
    lower: String,
}

impl<'a> RowView<'a> {
    fn new(cells: &'a [Option<String>]) -> Self {
        let cleaned: Vec<&str> = cells
            .iter()
            .filter_map(|c| c.as_deref())
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .collect();
        let text = cleaned.join(" ");
        let lower = text.to_lowercase();
        Self {
            cleaned,
            text,
            lower,
        }
    }
}

type Rule = fn(&RowClassifier, &RowView<'_>) -> Option<ClassifiedRow>;

/// Precedence chain. See the module docs before reordering.
const RULES: &[Rule] = &[
    fund_banner_rule,
    as_on_date_rule,
    grand_total_rule,
    stop_word_rule,
    data_rule,
    section_rule,
    header_rule,
];

/// Classifies rows of one file. Holds the AMC's fund keys and the section labels in use.
#[derive(Debug, Clone)]
pub struct RowClassifier {
    fund_keys: Vec<String>,
    section_labels: Vec<String>,
}

impl RowClassifier {
    /// `fund_keys` are canonical keys (see [`normalize_name`]) of the AMC's funds.
    pub fn new<I, S>(fund_keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut keys: Vec<String> = fund_keys
            .into_iter()
            .map(|k| normalize_name(k.as_ref()))
            .filter(|k| !k.is_empty())
            .collect();
        keys.sort();
        keys.dedup();

        Self {
            fund_keys: keys,
            section_labels: SECTION_LABELS.iter().map(|s| s.to_string()).collect(),
        }
    }

    /// Adds publisher-specific section labels to the built-in list.
    pub fn with_extra_section_labels(mut self, labels: &[String]) -> Self {
        for label in labels {
            let label = label.trim().to_lowercase();
            if !label.is_empty() && !self.section_labels.contains(&label) {
                self.section_labels.push(label);
            }
        }
        self
    }

    pub fn classify(&self, cells: &[Option<String>]) -> ClassifiedRow {
        let row = RowView::new(cells);
        if row.cleaned.is_empty() {
            return ClassifiedRow::new(RowKind::Empty);
        }

        RULES
            .iter()
            .find_map(|rule| rule(self, &row))
            .unwrap_or_else(|| ClassifiedRow::new(RowKind::Skip))
    }

    /// A cell key matches a fund when either contains the other.
    fn matches_fund_key(&self, key: &str) -> bool {
        if key.is_empty() {
            return false;
        }
        self.fund_keys
            .iter()
            .any(|fund| key.contains(fund.as_str()) || fund.contains(key))
    }
}

/// Classifies a row against an ad-hoc set of fund keys, with the built-in section labels.
pub fn classify_row(cells: &[Option<String>], known_fund_keys: &HashSet<String>) -> ClassifiedRow {
    RowClassifier::new(known_fund_keys.iter()).classify(cells)
}

/// True when the row has the shape of a holding line, regardless of keywords.
pub fn is_data_row(cells: &[Option<String>]) -> bool {
    has_data_shape(&RowView::new(cells))
}

fn has_data_shape(row: &RowView<'_>) -> bool {
    if row.cleaned.len() < DATA_MIN_CELLS {
        return false;
    }

    let has_name_cell = row.cleaned.iter().any(|c| {
        c.chars().any(char::is_alphabetic) && c.chars().count() > INSTRUMENT_NAME_MIN_LEN
    });
    if !has_name_cell {
        return false;
    }

    row.cleaned.iter().filter(|c| is_numeric_cell(c)).count() >= DATA_MIN_NUMERIC_CELLS
}

fn fund_banner_rule(classifier: &RowClassifier, row: &RowView<'_>) -> Option<ClassifiedRow> {
    if row.cleaned.len() > FUND_BANNER_MAX_CELLS {
        return None;
    }
    row.cleaned
        .iter()
        .find(|cell| classifier.matches_fund_key(&normalize_name(cell)))
        .map(|cell| ClassifiedRow::with_value(RowKind::FundBanner, *cell))
}

fn as_on_date_rule(_: &RowClassifier, row: &RowView<'_>) -> Option<ClassifiedRow> {
    if !AS_ON_MARKERS.iter().any(|m| row.lower.contains(m)) {
        return None;
    }
    extract_date_text(&row.text).map(|fragment| ClassifiedRow::with_value(RowKind::AsOnDate, fragment))
}

fn grand_total_rule(_: &RowClassifier, row: &RowView<'_>) -> Option<ClassifiedRow> {
    if row.lower.contains(GRAND_TOTAL_MARKER) && row.cleaned.iter().any(|c| is_numeric_cell(c)) {
        Some(ClassifiedRow::new(RowKind::GrandTotal))
    } else {
        None
    }
}

fn stop_word_rule(_: &RowClassifier, row: &RowView<'_>) -> Option<ClassifiedRow> {
    STOP_WORDS
        .iter()
        .any(|w| row.lower.contains(w))
        .then(|| ClassifiedRow::new(RowKind::Skip))
}

fn data_rule(_: &RowClassifier, row: &RowView<'_>) -> Option<ClassifiedRow> {
    has_data_shape(row).then(|| ClassifiedRow::new(RowKind::Data))
}

fn section_rule(classifier: &RowClassifier, row: &RowView<'_>) -> Option<ClassifiedRow> {
    row.cleaned
        .iter()
        .find(|cell| {
            let lower = cell.to_lowercase();
            classifier
                .section_labels
                .iter()
                .any(|label| lower.contains(label.as_str()))
        })
        .map(|cell| ClassifiedRow::with_value(RowKind::Section, *cell))
}

fn header_rule(_: &RowClassifier, row: &RowView<'_>) -> Option<ClassifiedRow> {
    let matches = row
        .cleaned
        .iter()
        .filter(|cell| {
            let lower = cell.to_lowercase();
            HEADER_KEYWORDS.iter().any(|k| lower.contains(k))
        })
        .count();
    (matches >= HEADER_MIN_MATCHES).then(|| ClassifiedRow::new(RowKind::Header))
}
