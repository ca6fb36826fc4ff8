//! NumericNormalizer: disambiguates locale-dependent thousand/decimal
//! separators by structure rather than by a fixed locale flag.
//!
//! Ported from `original_source/motor_precios.py::limpiar_precio`, with the
//! structural "rightmost separator wins" rule generalized to an arbitrary
//! count of thousand-separator occurrences (the Python original only ever
//! sees one or two groups in practice; this handles any number of them).

use rust_decimal::Decimal;
use std::str::FromStr;

/// Strips `$`, `USD`, `EUR` markers and surrounding whitespace, disambiguates
/// the separator roles, and parses the result as a strictly positive
/// `Decimal`. Returns `None` (the spec's `NotAPrice`) on any failure.
pub fn normalize(token: &str) -> Option<Decimal> {
    let stripped = token
        .trim()
        .replace('$', "")
        .replace("USD", "")
        .replace("EUR", "");
    let stripped = stripped.trim();
    if stripped.is_empty() {
        return None;
    }

    let comma_count = stripped.matches(',').count();
    let dot_count = stripped.matches('.').count();

    let cleaned = if comma_count >= 1 && dot_count >= 1 {
        let last_comma = stripped.rfind(',').unwrap();
        let last_dot = stripped.rfind('.').unwrap();
        if last_comma > last_dot {
            disambiguate(stripped, ',', '.')
        } else {
            disambiguate(stripped, '.', ',')
        }
    } else if comma_count >= 1 {
        // Only commas present: European convention, comma is the decimal
        // separator.
        stripped.replace(',', ".")
    } else if dot_count >= 1 {
        // Only dots present: a trailing three-digit group after the last
        // dot, preceded by at least one more digit group, is a thousand
        // separator (e.g. "108.200"); otherwise the dot is decimal
        // ("100.50").
        let parts: Vec<&str> = stripped.split('.').collect();
        if parts.len() > 1 && parts.last().map(|p| p.len()) == Some(3) {
            stripped.replace('.', "")
        } else {
            stripped.to_string()
        }
    } else {
        stripped.to_string()
    };

    let value = Decimal::from_str(&cleaned).ok()?;
    if value > Decimal::ZERO {
        Some(value)
    } else {
        None
    }
}

/// Removes every occurrence of `thousand` and rewrites the *last*
/// occurrence of `decimal` as a `.`, dropping any earlier occurrences of
/// `decimal` as stray thousand separators of the non-primary kind.
fn disambiguate(s: &str, decimal: char, thousand: char) -> String {
    let without_thousands: String = s.chars().filter(|&c| c != thousand).collect();
    match without_thousands.rfind(decimal) {
        Some(last_idx) => {
            let (left, right) = without_thousands.split_at(last_idx);
            let right = &right[decimal.len_utf8()..];
            let left_cleaned: String = left.chars().filter(|&c| c != decimal).collect();
            format!("{left_cleaned}.{right}")
        }
        None => without_thousands,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn mixed_separators_comma_decimal() {
        assert_eq!(normalize("17.684,21"), Some(dec!(17684.21)));
    }

    #[test]
    fn mixed_separators_dot_decimal() {
        assert_eq!(normalize("1,234.56"), Some(dec!(1234.56)));
    }

    #[test]
    fn only_comma_is_decimal_separator() {
        assert_eq!(normalize("864,05"), Some(dec!(864.05)));
        assert_eq!(normalize("100,50"), Some(dec!(100.50)));
    }

    #[test]
    fn only_dot_three_trailing_digits_is_thousands() {
        assert_eq!(normalize("108.200"), Some(dec!(108200)));
    }

    #[test]
    fn only_dot_two_trailing_digits_is_decimal() {
        assert_eq!(normalize("100.50"), Some(dec!(100.50)));
    }

    #[test]
    fn strips_currency_markers_and_whitespace() {
        assert_eq!(normalize("  $ 1.234,56 "), Some(dec!(1234.56)));
        assert_eq!(normalize("USD 100,50"), Some(dec!(100.50)));
    }

    #[test]
    fn rejects_zero_and_negative() {
        assert_eq!(normalize("0"), None);
        assert_eq!(normalize("0,00"), None);
        assert_eq!(normalize("-5,00"), None);
    }

    #[test]
    fn rejects_garbage() {
        assert_eq!(normalize(""), None);
        assert_eq!(normalize("nan"), None);
        assert_eq!(normalize("N/A"), None);
    }

    #[test]
    fn multiple_thousand_groups() {
        assert_eq!(normalize("1.234.567,89"), Some(dec!(1234567.89)));
        assert_eq!(normalize("1,234,567.89"), Some(dec!(1234567.89)));
    }

    #[test]
    fn single_digit_price_with_plain_decimal() {
        assert_eq!(normalize("5.2"), Some(dec!(5.2)));
    }
}
