//! Input validation for journal entries.

use crate::error::{JournalError, Result};
use chrono::NaiveDate;
use regex::Regex;
use std::sync::LazyLock;

/// Maximum allowed length for an entry ID.
pub const MAX_ID_LENGTH: usize = 64;

static DATE_FORMAT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\d{4}-\d{2}-\d{2}$").expect("date pattern is a valid regex")
});

const INVALID_DATE: &str = "Invalid or missing date (YYYY-MM-DD)";

/// Validates an ISO calendar date in zero-padded `YYYY-MM-DD` form.
///
/// Month listing matches on the `YYYY-MM-` prefix, so anything that is not
/// exactly four, two and two digits would silently drop out of the calendar.
pub fn validate_date(date: &str) -> Result<()> {
    if !DATE_FORMAT.is_match(date) {
        return Err(JournalError::Validation(INVALID_DATE.to_string()));
    }
    NaiveDate::parse_from_str(date, "%Y-%m-%d")
        .map_err(|_| JournalError::Validation(format!("Not a calendar date: {}", date)))?;
    Ok(())
}

/// Validates an optional date, failing when it is absent.
pub fn require_date(date: Option<&str>) -> Result<&str> {
    let date = date.ok_or_else(|| JournalError::Validation(INVALID_DATE.to_string()))?;
    validate_date(date)?;
    Ok(date)
}

/// Validates a year/month pair for month listing.
pub fn validate_year_month(year: i32, month: u32) -> Result<()> {
    if !(1..=9999).contains(&year) || !(1..=12).contains(&month) {
        return Err(JournalError::Validation(
            "Invalid year or month".to_string(),
        ));
    }
    Ok(())
}

/// Validates an entry ID supplied by a caller or an import document.
pub fn validate_id(id: &str) -> Result<()> {
    if id.is_empty() {
        return Err(JournalError::Validation("ID cannot be empty".to_string()));
    }
    if id.len() > MAX_ID_LENGTH {
        return Err(JournalError::Validation(format!(
            "ID exceeds maximum length of {} characters",
            MAX_ID_LENGTH
        )));
    }
    if id.contains(['/', '\\', '\0']) {
        return Err(JournalError::Validation(format!(
            "ID contains forbidden characters: {}",
            id
        )));
    }
    Ok(())
}
