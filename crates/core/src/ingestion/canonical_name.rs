use chrono::NaiveDate;

/// Canonical `{AMC}_{yyyy-MM-dd}_{DisclosureType}` name of a disclosure file.
///
/// Used both for duplicate detection and as the final upload name. Each name part drops
/// whitespace, control characters and ASCII punctuation other than `-`, so "Example Fund"
/// becomes `ExampleFund`. Non-ASCII letters and their combining marks are kept.
pub fn canonical_file_name(amc_name: &str, as_on_date: NaiveDate, disclosure_type: &str) -> String {
    format!(
        "{}_{}_{}",
        sanitize_part(amc_name),
        as_on_date.format("%Y-%m-%d"),
        sanitize_part(disclosure_type)
    )
}

fn sanitize_part(part: &str) -> String {
    part.chars()
        .filter(|c| *c == '-' || !(c.is_whitespace() || c.is_control() || c.is_ascii_punctuation()))
        .collect()
}
