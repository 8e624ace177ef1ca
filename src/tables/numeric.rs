//! Normalization of numeric text fields.
//!
//! Search engine exports may format numbers with thousands separators
//! (`"1,234.5"`). Every numeric field is trimmed and stripped of separators
//! before parsing. Run identifiers are nullable: an empty field is `None`,
//! never zero.

use std::borrow::Cow;
use std::str::FromStr;

use super::TableError;

/// Thousands separator removed from numeric fields before parsing.
pub const THOUSANDS_SEPARATOR: char = ',';

/// Remove thousands separators, borrowing when there is nothing to strip.
pub fn strip_separators(raw: &str) -> Cow<'_, str> {
    let trimmed = raw.trim();
    if trimmed.contains(THOUSANDS_SEPARATOR) {
        Cow::Owned(trimmed.replace(THOUSANDS_SEPARATOR, ""))
    } else {
        Cow::Borrowed(trimmed)
    }
}

fn parse_number<T: FromStr>(raw: &str, column: &str, row: usize) -> Result<T, TableError> {
    strip_separators(raw)
        .parse::<T>()
        .map_err(|_| TableError::MalformedNumber {
            row,
            column: column.to_string(),
            value: raw.to_string(),
        })
}

/// Parse an integer field (flags, scan numbers).
pub fn parse_int(raw: &str, column: &str, row: usize) -> Result<i64, TableError> {
    parse_number(raw, column, row)
}

/// Parse a floating point field (scores, m/z, errors).
pub fn parse_float(raw: &str, column: &str, row: usize) -> Result<f64, TableError> {
    parse_number(raw, column, row)
}

/// Parse a nullable run identifier. Empty text is a missing value.
pub fn parse_run(raw: &str, column: &str, row: usize) -> Result<Option<i64>, TableError> {
    if raw.trim().is_empty() {
        Ok(None)
    } else {
        parse_int(raw, column, row).map(Some)
    }
}
