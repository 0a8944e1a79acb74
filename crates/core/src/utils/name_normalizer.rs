//! Canonical comparison keys for fund names and banner text.

use lazy_static::lazy_static;
use regex::{Captures, Regex};

lazy_static! {
    /// Full month names (and "sept") are folded to their three-letter abbreviation.
    static ref MONTH_NAME_REGEX: Regex = Regex::new(
        r"\b(january|february|march|april|june|july|august|september|sept|october|november|december)\b"
    )
    .expect("Invalid regex pattern");
}

const SEPARATORS: &[char] = &['-', '_', '.', ':'];

/// Normalizes free text into a key used to compare fund names.
///
/// `"CRISIL-IBX50 Gilt Index - April 2028"` and `"crisil ibx 50 gilt index apr 2028"`
/// produce the same key. The function is idempotent.
pub fn normalize_name(text: &str) -> String {
    let lowered = text.to_lowercase();

    let separated: String = lowered
        .chars()
        .map(|c| if SEPARATORS.contains(&c) { ' ' } else { c })
        .filter(|c| c.is_alphanumeric() || c.is_whitespace())
        .collect();

    let spaced = split_letter_digit_runs(&separated);

    let abbreviated = MONTH_NAME_REGEX.replace_all(&spaced, |caps: &Captures| caps[1][..3].to_string());

    abbreviated.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Inserts a space wherever a letter touches a digit, in either order.
fn split_letter_digit_runs(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + 8);
    let mut prev: Option<char> = None;
    for c in text.chars() {
        if let Some(p) = prev {
            let boundary = (p.is_alphabetic() && c.is_numeric()) || (p.is_numeric() && c.is_alphabetic());
            if boundary {
                out.push(' ');
            }
        }
        out.push(c);
        prev = Some(c);
    }
    out
}
