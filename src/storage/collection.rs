//! Mutations on an in-memory entry list, shared by the file-backed stores.

use super::generate_id;
use crate::error::{JournalError, Result};
use crate::model::{Entry, EntryDraft};
use crate::validation;

/// Insert a new entry for `date`, dropping whatever was on that date before.
pub(crate) fn replace_for_date(
    entries: &mut Vec<Entry>,
    date: &str,
    draft: &EntryDraft,
) -> Result<String> {
    validation::validate_date(date)?;

    let before = entries.len();
    entries.retain(|e| e.date != date);
    if entries.len() != before {
        tracing::debug!(date = %date, replaced = before - entries.len(), "Replacing entry for date");
    }

    let entry = Entry::new(generate_id(), date.to_string(), draft.clone());
    let id = entry.id.clone();
    entries.push(entry);
    Ok(id)
}

pub(crate) fn update_by_id(entries: &mut [Entry], id: &str, draft: &EntryDraft) -> Result<()> {
    let entry = entries
        .iter_mut()
        .find(|e| e.id == id)
        .ok_or_else(|| JournalError::NotFound(id.to_string()))?;
    entry.apply(draft);
    Ok(())
}

pub(crate) fn remove_by_id(entries: &mut Vec<Entry>, id: &str) -> Result<()> {
    let before = entries.len();
    entries.retain(|e| e.id != id);
    if entries.len() == before {
        return Err(JournalError::NotFound(id.to_string()));
    }
    Ok(())
}
