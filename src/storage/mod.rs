//! Entry storage.
//!
//! Every backing store implements the same [`EntryStore`] capability set, so
//! callers (and the [`crate::selector::StoreSelector`]) can swap one for another
//! without seeing a difference in shapes.
//!
//! ## Stores
//!
//! - [`JsonFileStore`]: the canonical store behind the HTTP API, a single
//!   `{ "entries": [...] }` JSON document on disk
//! - [`LocalStore`]: the device-local fallback, a bare JSON array that is
//!   re-read on every call
//! - [`RemoteStore`]: an HTTP client for a running API server

mod collection;
mod json_file;
mod local;
mod remote;

pub use json_file::JsonFileStore;
pub use local::{LOCAL_STORAGE_KEY, LocalStore};
pub use remote::RemoteStore;

use crate::error::{JournalError, Result};
use crate::import_export::ImportedEntry;
use crate::model::{Entry, EntryDraft, MonthSummary, SearchHit};
use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;

/// The operations a journal backing store provides.
pub trait EntryStore {
    /// Exact-date lookup. Fails with `NotFound` when the date has no entry.
    fn get_by_date(&self, date: &str) -> Result<Entry>;

    /// `{id, date, mood}` for every entry dated in the given month.
    fn list_by_month(&self, year: i32, month: u32) -> Result<Vec<MonthSummary>>;

    /// Case-insensitive title/content search, newest first, at most 100 hits.
    fn search(&self, query: &str) -> Result<Vec<SearchHit>>;

    /// Insert an entry for `date`, replacing any entry already on that date.
    /// Returns the id of the new entry.
    fn create_or_replace(&self, date: &str, draft: &EntryDraft) -> Result<String>;

    /// Overwrite the editable fields of the entry with this id.
    fn update(&self, id: &str, draft: &EntryDraft) -> Result<()>;

    fn delete(&self, id: &str) -> Result<()>;

    /// Every entry, newest date first.
    fn export_all(&self) -> Result<Vec<Entry>>;

    /// Upsert imported entries by id. Returns the number processed.
    fn import_entries(&self, entries: &[ImportedEntry]) -> Result<usize>;
}

/// Generate a fresh entry id.
pub fn generate_id() -> String {
    nanoid::nanoid!()
}

/// Atomically write content to a file using temp file + rename, so a crash
/// never leaves a half-written journal behind.
pub(crate) fn atomic_write(target_path: &Path, content: &str) -> Result<()> {
    let target_dir = target_path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    std::fs::create_dir_all(target_dir)?;

    let mut temp_file = NamedTempFile::new_in(target_dir)
        .map_err(|e| JournalError::Storage(format!("Failed to create temp file: {}", e)))?;

    temp_file
        .write_all(content.as_bytes())
        .map_err(|e| JournalError::Storage(format!("Failed to write to temp file: {}", e)))?;

    temp_file
        .as_file()
        .sync_all()
        .map_err(|e| JournalError::Storage(format!("Failed to sync temp file: {}", e)))?;

    temp_file
        .persist(target_path)
        .map_err(|e| JournalError::Storage(format!("Failed to persist temp file: {}", e)))?;

    Ok(())
}
