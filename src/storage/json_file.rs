use super::{EntryStore, atomic_write, collection};
use crate::{
    error::{JournalError, Result},
    import_export::{self, ImportedEntry},
    model::{Entry, EntryDraft, MonthSummary, SearchHit},
    search,
};
use serde::{Deserialize, Serialize};
use std::cell::RefCell;
use std::path::{Path, PathBuf};

/// On-disk shape of the journal file.
#[derive(Debug, Default, Serialize, Deserialize)]
struct JournalFile {
    #[serde(default)]
    entries: Vec<Entry>,
}

/// The canonical entry store: one JSON document holding every entry.
///
/// Entries are loaded on first use and kept in memory; every mutation
/// writes the whole document back before returning.
pub struct JsonFileStore {
    path: PathBuf,
    cache: RefCell<Option<Vec<Entry>>>,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            cache: RefCell::new(None),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Drop the in-memory copy (call after external file changes)
    pub fn invalidate_cache(&self) {
        *self.cache.borrow_mut() = None;
    }

    fn load(&self) -> Result<Vec<Entry>> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }
        let content = std::fs::read_to_string(&self.path)?;
        if content.trim().is_empty() {
            return Ok(Vec::new());
        }
        let file: JournalFile = serde_json::from_str(&content).map_err(|e| {
            JournalError::Storage(format!(
                "Failed to parse journal file {}: {}",
                self.path.display(),
                e
            ))
        })?;
        tracing::debug!(path = %self.path.display(), count = file.entries.len(), "Loaded journal file");
        Ok(file.entries)
    }

    fn with_entries<T>(&self, f: impl FnOnce(&[Entry]) -> T) -> Result<T> {
        if self.cache.borrow().is_none() {
            let entries = self.load()?;
            *self.cache.borrow_mut() = Some(entries);
        }
        let cache = self.cache.borrow();
        Ok(f(cache.as_deref().unwrap_or_default()))
    }

    /// Run a mutation against a working copy and persist it. The cache only
    /// changes once the write has succeeded.
    fn mutate<T>(&self, f: impl FnOnce(&mut Vec<Entry>) -> Result<T>) -> Result<T> {
        let mut entries = self.with_entries(|e| e.to_vec())?;
        let out = f(&mut entries)?;
        self.persist(&entries)?;
        *self.cache.borrow_mut() = Some(entries);
        Ok(out)
    }

    fn persist(&self, entries: &[Entry]) -> Result<()> {
        let file = JournalFile {
            entries: entries.to_vec(),
        };
        let content = serde_json::to_string_pretty(&file)?;
        atomic_write(&self.path, &content)
    }
}

impl EntryStore for JsonFileStore {
    fn get_by_date(&self, date: &str) -> Result<Entry> {
        self.with_entries(|entries| search::entry_for_date(entries, date))?
    }

    fn list_by_month(&self, year: i32, month: u32) -> Result<Vec<MonthSummary>> {
        self.with_entries(|entries| search::month_summaries(entries, year, month))?
    }

    fn search(&self, query: &str) -> Result<Vec<SearchHit>> {
        self.with_entries(|entries| search::search_entries(entries, query))
    }

    fn create_or_replace(&self, date: &str, draft: &EntryDraft) -> Result<String> {
        let id = self.mutate(|entries| collection::replace_for_date(entries, date, draft))?;
        tracing::info!(id = %id, date = %date, "Saved entry");
        Ok(id)
    }

    fn update(&self, id: &str, draft: &EntryDraft) -> Result<()> {
        tracing::info!(id = %id, "Updating entry");
        self.mutate(|entries| collection::update_by_id(entries, id, draft))
    }

    fn delete(&self, id: &str) -> Result<()> {
        tracing::info!(id = %id, "Deleting entry");
        self.mutate(|entries| collection::remove_by_id(entries, id))
    }

    fn export_all(&self) -> Result<Vec<Entry>> {
        self.with_entries(search::snapshot)
    }

    fn import_entries(&self, incoming: &[ImportedEntry]) -> Result<usize> {
        let count = self.mutate(|entries| Ok(import_export::merge_entries(entries, incoming)))?;
        tracing::info!(count, "Imported entries");
        Ok(count)
    }
}
