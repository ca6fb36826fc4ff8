//! Currency/decimal formatting utilities for CLI table output.
//!
//! Generalized from the teacher's fixed `format_currency` (hardcoded "R$ "
//! prefix, Brazilian Real grouping) to a currency-tag parameter, since
//! `GlobalConfig::moneda` is an opaque, per-install string rather than a
//! single fixed locale. Grouping/decimal convention (`.` thousands, `,`
//! decimal) stays the teacher's, matching the Spanish-language domain this
//! crate now serves.

use rust_decimal::Decimal;

/// Formats a `Decimal` with a currency tag prefix, thousands separator
/// `.`, and decimal separator `,`: `format_currency(dec!(1234.56), "ARS")`
/// => `"ARS 1.234,56"`.
pub fn format_currency(value: Decimal, currency_tag: &str) -> String {
    format!("{currency_tag} {}", format_decimal(value))
}

/// Formats a `Decimal` with no currency prefix: `"1.234,56"`.
pub fn format_decimal(value: Decimal) -> String {
    let is_negative = value < Decimal::ZERO;
    let abs_value = value.abs();

    let formatted = format!("{:.2}", abs_value);
    let parts: Vec<&str> = formatted.split('.').collect();
    let integer_part = parts[0];
    let decimal_part = parts.get(1).copied().unwrap_or("00");

    let with_separators: String = integer_part
        .chars()
        .rev()
        .enumerate()
        .flat_map(|(i, c)| if i > 0 && i % 3 == 0 { vec!['.', c] } else { vec![c] })
        .collect::<Vec<_>>()
        .into_iter()
        .rev()
        .collect();

    let sign = if is_negative { "-" } else { "" };
    format!("{sign}{with_separators},{decimal_part}")
}
