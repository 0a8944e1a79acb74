use rust_decimal::Decimal;
use std::str::FromStr;

/// Parses a display-formatted numeric cell.
///
/// Percent signs and thousands separators are stripped, `(1,234.50)` is read as an
/// accounting negative, and scientific notation is accepted. Anything else yields `None`.
pub fn parse_number(raw: &str) -> Option<Decimal> {
    let mut s: String = raw
        .trim()
        .chars()
        .filter(|c| *c != '%' && *c != ',')
        .collect();
    s = s.trim().to_string();

    let negative = s.len() > 2 && s.starts_with('(') && s.ends_with(')');
    if negative {
        s = s[1..s.len() - 1].trim().to_string();
    }

    if s.is_empty() || !s.chars().any(|c| c.is_ascii_digit()) {
        return None;
    }

    let parsed = Decimal::from_str(&s)
        .or_else(|_| Decimal::from_scientific(&s))
        .ok()?;

    Some(if negative { -parsed } else { parsed })
}

/// True when the cell reads as a number under [`parse_number`].
pub fn is_numeric_cell(raw: &str) -> bool {
    parse_number(raw).is_some()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_parse_plain_and_formatted_numbers() {
        assert_eq!(parse_number("1000"), Some(dec!(1000)));
        assert_eq!(parse_number("1,000,000"), Some(dec!(1000000)));
        assert_eq!(parse_number(" 5.00% "), Some(dec!(5.00)));
        assert_eq!(parse_number("-0.25%"), Some(dec!(-0.25)));
        assert_eq!(parse_number("+12.5"), Some(dec!(12.5)));
    }

    #[test]
    fn test_parse_accounting_negative() {
        assert_eq!(parse_number("(1,234.50)"), Some(dec!(-1234.50)));
    }

    #[test]
    fn test_parse_scientific() {
        assert_eq!(parse_number("1.5e3"), Some(dec!(1500)));
    }

    #[test]
    fn test_rejects_non_numeric_cells() {
        assert_eq!(parse_number(""), None);
        assert_eq!(parse_number("   "), None);
        assert_eq!(parse_number("%"), None);
        assert_eq!(parse_number("-"), None);
        assert_eq!(parse_number("()"), None);
        assert_eq!(parse_number("INE000A01010"), None);
        assert_eq!(parse_number("AAA"), None);
        assert_eq!(parse_number("30-11-2025"), None);
        assert_eq!(parse_number("NaN"), None);
        assert_eq!(parse_number("inf"), None);
    }
}
