//! Extraction and parsing of the as-on date embedded in banner text.

use chrono::NaiveDate;
use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    /// Date fragments found in portfolio statements:
    /// `30-11-2025`, `30/11/2025`, `30.11.2025`, `2025-11-30`, `2025/11/30`,
    /// `30 Nov 2025`, `30-Nov-2025`, `30th November 2025`, `Nov 30, 2025`, `November 30th 2025`.
    static ref DATE_FRAGMENT_REGEX: Regex = Regex::new(
        r"(?ix)
        \b(?:
            \d{1,2}[-/.]\d{1,2}[-/.]\d{4}
          | \d{4}[-/.]\d{1,2}[-/.]\d{1,2}
          | \d{1,2}(?:st|nd|rd|th)?[\s\-/.]+(?:jan|feb|mar|apr|may|jun|jul|aug|sep|oct|nov|dec)[a-z]*\.?[\s\-/.,]+\d{4}
          | (?:jan|feb|mar|apr|may|jun|jul|aug|sep|oct|nov|dec)[a-z]*\.?[\s\-]+\d{1,2}(?:st|nd|rd|th)?,?\s*\d{4}
        )\b"
    )
    .expect("Invalid regex pattern");
}

const NUMERIC_FORMATS: &[&str] = &["%d-%m-%Y", "%d/%m/%Y", "%d.%m.%Y", "%Y-%m-%d", "%Y/%m/%d", "%Y.%m.%d"];

const MONTHS: &[&str] = &[
    "jan", "feb", "mar", "apr", "may", "jun", "jul", "aug", "sep", "oct", "nov", "dec",
];

/// Returns the first date-looking substring of `text`, if any.
pub fn extract_date_text(text: &str) -> Option<&str> {
    DATE_FRAGMENT_REGEX.find(text).map(|m| m.as_str())
}

/// Parses a date fragment previously returned by [`extract_date_text`].
///
/// Returns `None` for fragments that look like dates but are not valid calendar days.
pub fn parse_date_fragment(fragment: &str) -> Option<NaiveDate> {
    let fragment = fragment.trim();

    for format in NUMERIC_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(fragment, format) {
            return Some(date);
        }
    }

    parse_month_name_date(fragment)
}

/// Finds and parses the first date in `text`.
pub fn find_date(text: &str) -> Option<NaiveDate> {
    extract_date_text(text).and_then(parse_date_fragment)
}

fn parse_month_name_date(fragment: &str) -> Option<NaiveDate> {
    let tokens: Vec<String> = fragment
        .split(|c: char| !c.is_alphanumeric())
        .filter(|t| !t.is_empty())
        .map(|t| t.to_lowercase())
        .collect();

    let mut month: Option<u32> = None;
    let mut day: Option<u32> = None;
    let mut year: Option<i32> = None;

    for token in &tokens {
        if token.chars().next().is_some_and(|c| c.is_ascii_digit()) {
            let digits: String = token.chars().take_while(|c| c.is_ascii_digit()).collect();
            if digits.len() == 4 {
                year = digits.parse().ok();
            } else {
                day = digits.parse().ok();
            }
        } else if month.is_none() {
            month = MONTHS
                .iter()
                .position(|m| token.starts_with(m))
                .map(|idx| idx as u32 + 1);
        }
    }

    NaiveDate::from_ymd_opt(year?, month?, day?)
}
