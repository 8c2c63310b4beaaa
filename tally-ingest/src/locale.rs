//! European-locale field parsing: "1.234,56" amounts and DD/MM/YYYY dates.

use chrono::NaiveDate;
use regex::Regex;
use rust_decimal::Decimal;
use std::str::FromStr;
use std::sync::LazyLock;

pub const DATE_FORMAT: &str = "%d/%m/%Y";

/// Largest magnitude accepted for a single amount (10^15). Keeps ledger sums
/// far from `Decimal::MAX`.
pub fn max_amount() -> Decimal {
    Decimal::from(1_000_000_000_000_000_i64)
}

pub fn is_plausible_amount(value: Decimal) -> bool {
    value.abs() <= max_amount()
}

static THOUSANDS_ONLY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{1,3}(\.\d{3})+$").expect("valid thousands pattern"));

/// Parse a day/month/year date. A trailing time part ("12/03/2025 00:00") is ignored.
pub fn parse_dmy_date(raw: &str) -> Option<NaiveDate> {
    let date_part = raw.split_whitespace().next()?;
    NaiveDate::parse_from_str(date_part, DATE_FORMAT).ok()
}

/// Parse an amount written with "." thousands and "," decimal separators.
///
/// - `"-100,00"` -> -100.00
/// - `"1.234,56"` -> 1234.56
/// - `"1.234"` -> 1234 (a dot followed by exact groups of three is a thousands mark)
/// - `"12.5"` -> 12.5 (no comma and not grouped: read as a plain decimal)
///
/// Returns `None` for empty or non-numeric input and for magnitudes above
/// [`max_amount`].
pub fn parse_european_decimal(raw: &str) -> Option<Decimal> {
    let s = raw.trim();
    let (negative, digits) = match s.strip_prefix('-') {
        Some(rest) => (true, rest.trim_start()),
        None => (false, s.strip_prefix('+').unwrap_or(s).trim_start()),
    };
    if digits.is_empty() || !digits.starts_with(|c: char| c.is_ascii_digit() || c == ',' || c == '.') {
        return None;
    }

    let normalized = if digits.contains(',') {
        digits.replace('.', "").replace(',', ".")
    } else if THOUSANDS_ONLY.is_match(digits) {
        digits.replace('.', "")
    } else {
        digits.to_string()
    };
    if !normalized.chars().all(|c| c.is_ascii_digit() || c == '.') {
        return None;
    }

    let value = Decimal::from_str(&normalized).ok()?;
    if !is_plausible_amount(value) {
        return None;
    }
    Some(if negative { -value } else { value })
}
