//! Month grid for the calendar view.

use crate::error::{JournalError, Result};
use crate::model::MonthSummary;
use crate::validation;
use chrono::{Datelike, Days, NaiveDate};
use std::collections::HashMap;

/// Six weeks of seven days.
pub const GRID_CELLS: usize = 42;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CalendarDay {
    pub date: NaiveDate,
    /// The day belongs to the previous or next month.
    pub outside: bool,
    pub is_today: bool,
    pub has_entry: bool,
    pub mood: Option<i64>,
}

/// Lay out `year`/`month` as 42 days starting on the Sunday on or before
/// the 1st. Entry markers come from `summaries`, matched by date.
pub fn month_grid(
    year: i32,
    month: u32,
    today: NaiveDate,
    summaries: &[MonthSummary],
) -> Result<Vec<CalendarDay>> {
    validation::validate_year_month(year, month)?;
    let first = NaiveDate::from_ymd_opt(year, month, 1)
        .ok_or_else(|| JournalError::Validation("Invalid year or month".to_string()))?;
    let lead = u64::from(first.weekday().num_days_from_sunday());
    let start = first
        .checked_sub_days(Days::new(lead))
        .ok_or_else(|| JournalError::Validation("Invalid year or month".to_string()))?;

    let by_date: HashMap<&str, &MonthSummary> =
        summaries.iter().map(|s| (s.date.as_str(), s)).collect();

    let mut days = Vec::with_capacity(GRID_CELLS);
    for date in start.iter_days().take(GRID_CELLS) {
        let key = date.format("%Y-%m-%d").to_string();
        let summary = by_date.get(key.as_str());
        days.push(CalendarDay {
            date,
            outside: date.month() != month || date.year() != year,
            is_today: date == today,
            has_entry: summary.is_some(),
            mood: summary.and_then(|s| s.mood),
        });
    }
    Ok(days)
}

/// Month title as shown above the grid, e.g. "March 2024".
pub fn month_title(year: i32, month: u32) -> String {
    NaiveDate::from_ymd_opt(year, month, 1)
        .map(|d| d.format("%B %Y").to_string())
        .unwrap_or_else(|| format!("{:04}-{:02}", year, month))
}

/// The month before `year`/`month`.
pub fn previous_month(year: i32, month: u32) -> (i32, u32) {
    if month <= 1 { (year - 1, 12) } else { (year, month - 1) }
}

/// The month after `year`/`month`.
pub fn next_month(year: i32, month: u32) -> (i32, u32) {
    if month >= 12 { (year + 1, 1) } else { (year, month + 1) }
}
