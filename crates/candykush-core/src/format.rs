//! # Number Formatting
//!
//! Thousand-separated renderings used on dashboards and printed reports:
//! `฿1,234.56`, `1,234`, `x1,234`, `12.5%`.

use crate::money::Money;
use crate::CURRENCY_SYMBOL;

/// Inserts `,` every three digits of an unsigned digit string.
fn group_digits(digits: &str) -> String {
    let len = digits.len();
    let mut out = String::with_capacity(len + len / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// Groups the integer part of an already rounded decimal string.
fn group_decimal(rendered: &str) -> String {
    let (sign, unsigned) = match rendered.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", rendered),
    };
    let (int_part, frac_part) = match unsigned.split_once('.') {
        Some((int_part, frac)) => (int_part, Some(frac)),
        None => (unsigned, None),
    };

    let mut out = format!("{}{}", sign, group_digits(int_part));
    if let Some(frac) = frac_part {
        out.push('.');
        out.push_str(frac);
    }
    out
}

/// Formats a money amount with separators and a prefix.
///
/// ## Example
/// ```rust
/// use candykush_core::{format, Money};
///
/// assert_eq!(format::currency(Money::from_satang(123_456), "฿"), "฿1,234.56");
/// assert_eq!(format::currency(Money::from_satang(-99), "$"), "$-0.99");
/// ```
pub fn currency(amount: Money, prefix: &str) -> String {
    format!("{}{}", prefix, group_decimal(&amount.to_decimal_string()))
}

/// Formats a money amount with the baht prefix.
pub fn baht(amount: Money) -> String {
    currency(amount, &CURRENCY_SYMBOL.to_string())
}

/// Formats an integer with thousand separators (`1,234,567`).
pub fn integer(value: i64) -> String {
    group_decimal(&value.to_string())
}

/// Formats a count with a prefix (`x1,234`).
pub fn quantity(value: i64, prefix: &str) -> String {
    format!("{}{}", prefix, integer(value))
}

/// Formats a percentage with one decimal (`12.5%`).
pub fn percent(value: f64) -> String {
    format!("{}%", decimal(value, 1))
}

/// Formats a float with `decimals` places and thousand separators.
pub fn decimal(value: f64, decimals: usize) -> String {
    let rendered = format!("{:.*}", decimals, value);
    // "-0.0" reads oddly on a dashboard
    let rendered = if rendered.starts_with('-') && rendered.trim_start_matches(['-', '0', '.']).is_empty() {
        rendered[1..].to_string()
    } else {
        rendered
    };
    group_decimal(&rendered)
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_currency() {
        assert_eq!(currency(Money::from_satang(0), "฿"), "฿0.00");
        assert_eq!(currency(Money::from_satang(99_999), "฿"), "฿999.99");
        assert_eq!(currency(Money::from_satang(100_000), "฿"), "฿1,000.00");
        assert_eq!(baht(Money::from_satang(123_456_789)), "฿1,234,567.89");
    }

    #[test]
    fn test_integer_and_quantity() {
        assert_eq!(integer(0), "0");
        assert_eq!(integer(999), "999");
        assert_eq!(integer(1_234), "1,234");
        assert_eq!(integer(-1_234_567), "-1,234,567");
        assert_eq!(quantity(1_234, "x"), "x1,234");
    }

    #[test]
    fn test_percent_and_decimal() {
        assert_eq!(percent(12.5), "12.5%");
        assert_eq!(percent(0.0), "0.0%");
        assert_eq!(decimal(1234.5, 2), "1,234.50");
        assert_eq!(decimal(1234.5, 0), "1,234");
        assert_eq!(decimal(-0.01, 1), "0.0");
    }
}
