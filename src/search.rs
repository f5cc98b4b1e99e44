//! Query logic shared by every store that keeps the full entry list at hand.
//!
//! All lookups are linear scans over the slice.

use crate::error::{JournalError, Result};
use crate::model::{Entry, MonthSummary, SearchHit};
use crate::validation;

/// Maximum number of hits returned by [`search_entries`].
pub const MAX_SEARCH_RESULTS: usize = 100;

/// Find the entry for an exact date.
pub fn entry_for_date(entries: &[Entry], date: &str) -> Result<Entry> {
    validation::validate_date(date)?;
    entries
        .iter()
        .find(|e| e.date == date)
        .cloned()
        .ok_or_else(|| JournalError::NotFound(format!("No entry for {}", date)))
}

/// The `YYYY-MM-` prefix every date in the given month starts with.
pub fn month_prefix(year: i32, month: u32) -> String {
    format!("{:04}-{:02}-", year, month)
}

/// Project the entries of one month for calendar rendering.
pub fn month_summaries(entries: &[Entry], year: i32, month: u32) -> Result<Vec<MonthSummary>> {
    validation::validate_year_month(year, month)?;
    let prefix = month_prefix(year, month);
    Ok(entries
        .iter()
        .filter(|e| e.date.starts_with(&prefix))
        .map(Entry::month_summary)
        .collect())
}

/// Case-insensitive substring search over title and content.
///
/// Results are newest date first and capped at [`MAX_SEARCH_RESULTS`].
/// A blank query matches nothing.
pub fn search_entries(entries: &[Entry], query: &str) -> Vec<SearchHit> {
    let query = query.trim();
    if query.is_empty() {
        return Vec::new();
    }
    let needle = query.to_lowercase();

    let mut matches: Vec<&Entry> = entries
        .iter()
        .filter(|e| {
            e.title.to_lowercase().contains(&needle) || e.content.to_lowercase().contains(&needle)
        })
        .collect();
    matches.sort_by(|a, b| b.date.cmp(&a.date));

    matches
        .into_iter()
        .take(MAX_SEARCH_RESULTS)
        .map(Entry::search_hit)
        .collect()
}

/// Full copy of the entries, newest date first.
pub fn snapshot(entries: &[Entry]) -> Vec<Entry> {
    let mut all = entries.to_vec();
    all.sort_by(|a, b| b.date.cmp(&a.date));
    all
}
