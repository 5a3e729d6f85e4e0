//! Date checks for receipt fields.
//!
//! Extracted dates stay verbatim on the record; these helpers only tell the
//! parser whether a `dd/mm/yyyy` string names a real calendar day.

use chrono::NaiveDate;

/// Parse a `dd/mm/yyyy` receipt date.
pub fn parse_receipt_date(text: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(text.trim(), "%d/%m/%Y").ok()
}

/// Whether the text is a valid `dd/mm/yyyy` calendar date.
pub fn is_calendar_date(text: &str) -> bool {
    parse_receipt_date(text).is_some()
}
