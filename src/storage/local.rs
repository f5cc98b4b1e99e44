use super::{EntryStore, atomic_write, collection};
use crate::{
    error::Result,
    import_export::{self, ImportedEntry},
    model::{Entry, EntryDraft, MonthSummary, SearchHit},
    search,
};
use std::path::{Path, PathBuf};

/// Storage key of the fallback entry list; also the file stem on disk.
pub const LOCAL_STORAGE_KEY: &str = "dj_entries_v1";

/// Device-local fallback store, used while the remote store is unreachable.
///
/// Holds a bare JSON array of entries. There is no in-memory copy: every
/// operation reads the file, so several short-lived processes on the same
/// device see each other's writes. An unreadable file reads as empty.
pub struct LocalStore {
    path: PathBuf,
}

impl LocalStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// A store keyed by [`LOCAL_STORAGE_KEY`] inside `dir`.
    pub fn in_dir(dir: &Path) -> Self {
        Self::new(dir.join(format!("{}.json", LOCAL_STORAGE_KEY)))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> Vec<Entry> {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Vec::new(),
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "Failed to read local entries");
                return Vec::new();
            }
        };
        match serde_json::from_str(&content) {
            Ok(entries) => entries,
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "Discarding unreadable local entries");
                Vec::new()
            }
        }
    }

    fn save(&self, entries: &[Entry]) -> Result<()> {
        let content = serde_json::to_string(entries)?;
        atomic_write(&self.path, &content)
    }

    fn mutate<T>(&self, f: impl FnOnce(&mut Vec<Entry>) -> Result<T>) -> Result<T> {
        let mut entries = self.load();
        let out = f(&mut entries)?;
        self.save(&entries)?;
        Ok(out)
    }
}

impl EntryStore for LocalStore {
    fn get_by_date(&self, date: &str) -> Result<Entry> {
        search::entry_for_date(&self.load(), date)
    }

    fn list_by_month(&self, year: i32, month: u32) -> Result<Vec<MonthSummary>> {
        search::month_summaries(&self.load(), year, month)
    }

    fn search(&self, query: &str) -> Result<Vec<SearchHit>> {
        Ok(search::search_entries(&self.load(), query))
    }

    fn create_or_replace(&self, date: &str, draft: &EntryDraft) -> Result<String> {
        let id = self.mutate(|entries| collection::replace_for_date(entries, date, draft))?;
        tracing::info!(id = %id, date = %date, "Saved entry locally");
        Ok(id)
    }

    fn update(&self, id: &str, draft: &EntryDraft) -> Result<()> {
        tracing::info!(id = %id, "Updating local entry");
        self.mutate(|entries| collection::update_by_id(entries, id, draft))
    }

    fn delete(&self, id: &str) -> Result<()> {
        tracing::info!(id = %id, "Deleting local entry");
        self.mutate(|entries| collection::remove_by_id(entries, id))
    }

    fn export_all(&self) -> Result<Vec<Entry>> {
        Ok(search::snapshot(&self.load()))
    }

    fn import_entries(&self, incoming: &[ImportedEntry]) -> Result<usize> {
        let count = self.mutate(|entries| Ok(import_export::merge_entries(entries, incoming)))?;
        tracing::info!(count, "Imported entries locally");
        Ok(count)
    }
}
