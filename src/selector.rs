//! Routing between the remote store and the local fallback.
//!
//! The selector owns the availability flag. Month listing doubles as the
//! liveness probe because every calendar render issues one; any other
//! operation that hits a transport failure flips the flag and is replayed
//! against the local store. Local writes made while offline stay local
//! until [`StoreSelector::backfill`] is run.

use crate::error::{JournalError, Result};
use crate::import_export::{ImportDocument, ImportedEntry};
use crate::model::{Entry, EntryDraft, MonthSummary, SearchHit};
use crate::storage::EntryStore;
use crate::validation;
use std::cell::Cell;
use std::collections::{HashMap, HashSet};

pub struct StoreSelector<R, L> {
    remote: R,
    local: L,
    available: Cell<bool>,
    pinned_offline: bool,
}

impl<R: EntryStore, L: EntryStore> StoreSelector<R, L> {
    /// Start optimistic: the remote is assumed reachable until a call fails.
    pub fn new(remote: R, local: L) -> Self {
        Self {
            remote,
            local,
            available: Cell::new(true),
            pinned_offline: false,
        }
    }

    /// Never talk to the remote store.
    pub fn offline(remote: R, local: L) -> Self {
        Self {
            remote,
            local,
            available: Cell::new(false),
            pinned_offline: true,
        }
    }

    pub fn is_available(&self) -> bool {
        self.available.get()
    }

    /// Human-readable availability, as shown next to the calendar.
    pub fn status_label(&self) -> &'static str {
        if self.is_available() {
            "Connected"
        } else {
            "Offline"
        }
    }

    pub fn remote(&self) -> &R {
        &self.remote
    }

    pub fn local(&self) -> &L {
        &self.local
    }

    fn mark_unavailable(&self, op: &str, error: &JournalError) {
        if self.available.replace(false) {
            tracing::warn!(operation = op, error = %error, "Remote store unreachable, falling back to local store");
        } else {
            tracing::debug!(operation = op, error = %error, "Remote store still unreachable");
        }
    }

    /// Send an operation to whichever store is active. A transport failure
    /// on the remote side marks it unavailable and replays the operation
    /// locally; every other remote error is returned as is.
    fn route<T>(
        &self,
        op: &str,
        remote_op: impl FnOnce(&R) -> Result<T>,
        local_op: impl FnOnce(&L) -> Result<T>,
    ) -> Result<T> {
        if !self.is_available() {
            return local_op(&self.local);
        }
        match remote_op(&self.remote) {
            Err(e) if e.is_transport() => {
                self.mark_unavailable(op, &e);
                local_op(&self.local)
            }
            other => other,
        }
    }

    /// Re-check the remote using the month listing of the given month.
    ///
    /// Any remote failure on a valid month counts as unreachable here,
    /// including error statuses; the month is then answered from the local
    /// store. An out-of-range month is rejected before the remote is asked.
    pub fn probe(&self, year: i32, month: u32) -> Result<Vec<MonthSummary>> {
        validation::validate_year_month(year, month)?;
        if self.pinned_offline {
            return self.local.list_by_month(year, month);
        }
        match self.remote.list_by_month(year, month) {
            Ok(rows) => {
                if !self.available.replace(true) {
                    tracing::info!("Remote store reachable again");
                }
                Ok(rows)
            }
            Err(e) => {
                self.mark_unavailable("list_by_month", &e);
                self.local.list_by_month(year, month)
            }
        }
    }

    /// Push every locally stored entry to the remote store.
    ///
    /// Entries keep their ids, so running this twice does not duplicate
    /// rows. A remote row on the same date as a pushed entry but with an id
    /// the local store does not know is removed, so the date keeps a single
    /// entry and the offline edit wins. Local data is left in place. Fails
    /// when the remote cannot be reached.
    pub fn backfill(&self) -> Result<usize> {
        if self.pinned_offline {
            return Err(JournalError::Transport(
                "Backfill needs the remote store, but offline mode is on".to_string(),
            ));
        }
        let local = self.local.export_all()?;
        if local.is_empty() {
            return Ok(0);
        }
        let document = ImportDocument::from_entries(&local);
        let pushed = self
            .remote
            .import_entries(&document.entries)
            .and_then(|count| Ok((count, self.drop_shadowed_rows(&local)?)));
        match pushed {
            Ok((count, removed)) => {
                self.available.set(true);
                tracing::info!(count, removed, "Backfilled local entries to remote store");
                Ok(count)
            }
            Err(e) => {
                if e.is_transport() {
                    self.mark_unavailable("backfill", &e);
                }
                Err(e)
            }
        }
    }

    /// Delete remote rows that share a date with `local` entries but carry
    /// an id the local store does not have. Returns how many were removed.
    fn drop_shadowed_rows(&self, local: &[Entry]) -> Result<usize> {
        let mut ids_by_date: HashMap<&str, HashSet<&str>> = HashMap::new();
        for entry in local {
            ids_by_date
                .entry(entry.date.as_str())
                .or_default()
                .insert(entry.id.as_str());
        }

        let mut removed = 0;
        for row in self.remote.export_all()? {
            let shadowed = ids_by_date
                .get(row.date.as_str())
                .is_some_and(|ids| !ids.contains(row.id.as_str()));
            if shadowed {
                tracing::debug!(date = %row.date, id = %row.id, "Removing remote entry replaced by offline edit");
                self.remote.delete(&row.id)?;
                removed += 1;
            }
        }
        Ok(removed)
    }
}

impl<R: EntryStore, L: EntryStore> EntryStore for StoreSelector<R, L> {
    fn get_by_date(&self, date: &str) -> Result<Entry> {
        self.route(
            "get_by_date",
            |r| r.get_by_date(date),
            |l| l.get_by_date(date),
        )
    }

    fn list_by_month(&self, year: i32, month: u32) -> Result<Vec<MonthSummary>> {
        self.probe(year, month)
    }

    fn search(&self, query: &str) -> Result<Vec<SearchHit>> {
        self.route("search", |r| r.search(query), |l| l.search(query))
    }

    fn create_or_replace(&self, date: &str, draft: &EntryDraft) -> Result<String> {
        self.route(
            "create_or_replace",
            |r| r.create_or_replace(date, draft),
            |l| l.create_or_replace(date, draft),
        )
    }

    fn update(&self, id: &str, draft: &EntryDraft) -> Result<()> {
        self.route("update", |r| r.update(id, draft), |l| l.update(id, draft))
    }

    fn delete(&self, id: &str) -> Result<()> {
        self.route("delete", |r| r.delete(id), |l| l.delete(id))
    }

    fn export_all(&self) -> Result<Vec<Entry>> {
        self.route("export_all", |r| r.export_all(), |l| l.export_all())
    }

    fn import_entries(&self, entries: &[ImportedEntry]) -> Result<usize> {
        self.route(
            "import_entries",
            |r| r.import_entries(entries),
            |l| l.import_entries(entries),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::LocalStore;
    use std::cell::RefCell;
    use tempfile::TempDir;

    /// A remote that can be switched between answering from a local file
    /// and failing like a dead network.
    struct FlakyRemote {
        inner: LocalStore,
        down: Cell<bool>,
        calls: RefCell<Vec<&'static str>>,
    }

    impl FlakyRemote {
        fn new(dir: &std::path::Path) -> Self {
            Self {
                inner: LocalStore::new(dir.join("remote.json")),
                down: Cell::new(false),
                calls: RefCell::new(Vec::new()),
            }
        }

        fn check(&self, op: &'static str) -> Result<()> {
            self.calls.borrow_mut().push(op);
            if self.down.get() {
                Err(JournalError::Transport("connection refused".to_string()))
            } else {
                Ok(())
            }
        }
    }

    impl EntryStore for FlakyRemote {
        fn get_by_date(&self, date: &str) -> Result<Entry> {
            self.check("get_by_date")?;
            self.inner.get_by_date(date)
        }
        fn list_by_month(&self, year: i32, month: u32) -> Result<Vec<MonthSummary>> {
            self.check("list_by_month")?;
            self.inner.list_by_month(year, month)
        }
        fn search(&self, query: &str) -> Result<Vec<SearchHit>> {
            self.check("search")?;
            self.inner.search(query)
        }
        fn create_or_replace(&self, date: &str, draft: &EntryDraft) -> Result<String> {
            self.check("create_or_replace")?;
            self.inner.create_or_replace(date, draft)
        }
        fn update(&self, id: &str, draft: &EntryDraft) -> Result<()> {
            self.check("update")?;
            self.inner.update(id, draft)
        }
        fn delete(&self, id: &str) -> Result<()> {
            self.check("delete")?;
            self.inner.delete(id)
        }
        fn export_all(&self) -> Result<Vec<Entry>> {
            self.check("export_all")?;
            self.inner.export_all()
        }
        fn import_entries(&self, entries: &[ImportedEntry]) -> Result<usize> {
            self.check("import_entries")?;
            self.inner.import_entries(entries)
        }
    }

    fn setup() -> (StoreSelector<FlakyRemote, LocalStore>, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let remote = FlakyRemote::new(temp_dir.path());
        let local = LocalStore::new(temp_dir.path().join("local.json"));
        (StoreSelector::new(remote, local), temp_dir)
    }

    #[test]
    fn test_routes_to_remote_while_available() {
        let (selector, _temp_dir) = setup();

        selector
            .create_or_replace("2024-03-15", &EntryDraft::new("Trip", ""))
            .unwrap();

        assert!(selector.is_available());
        assert_eq!(selector.status_label(), "Connected");
        assert_eq!(selector.remote().inner.export_all().unwrap().len(), 1);
        assert!(selector.local().export_all().unwrap().is_empty());
    }

    #[test]
    fn test_probe_failure_falls_back_and_flags_offline() {
        let (selector, _temp_dir) = setup();
        selector
            .local()
            .create_or_replace("2024-03-01", &EntryDraft::new("local", ""))
            .unwrap();
        selector.remote().down.set(true);

        let rows = selector.list_by_month(2024, 3).unwrap();

        assert_eq!(rows.len(), 1);
        assert!(!selector.is_available());
        assert_eq!(selector.status_label(), "Offline");
    }

    #[test]
    fn test_transport_error_mid_session_retries_locally() {
        let (selector, _temp_dir) = setup();
        selector.remote().down.set(true);

        let id = selector
            .create_or_replace("2024-04-01", &EntryDraft::new("offline save", ""))
            .unwrap();

        assert!(!selector.is_available());
        assert_eq!(selector.local().get_by_date("2024-04-01").unwrap().id, id);

        // later calls skip the remote entirely
        selector.remote().calls.borrow_mut().clear();
        selector.get_by_date("2024-04-01").unwrap();
        assert!(selector.remote().calls.borrow().is_empty());
    }

    #[test]
    fn test_not_found_from_remote_is_not_a_fallback() {
        let (selector, _temp_dir) = setup();
        selector
            .local()
            .create_or_replace("2024-05-05", &EntryDraft::new("only local", ""))
            .unwrap();

        let err = selector.get_by_date("2024-05-05").unwrap_err();

        assert!(matches!(err, JournalError::NotFound(_)));
        assert!(selector.is_available());
    }

    #[test]
    fn test_probe_recovers_after_outage() {
        let (selector, _temp_dir) = setup();
        selector.remote().down.set(true);
        selector.list_by_month(2024, 1).unwrap();
        assert!(!selector.is_available());

        selector.remote().down.set(false);
        selector.list_by_month(2024, 1).unwrap();
        assert!(selector.is_available());
    }

    #[test]
    fn test_bad_month_keeps_remote_available() {
        let (selector, _temp_dir) = setup();

        for (year, month) in [(2024, 13), (2024, 0), (0, 5)] {
            let err = selector.list_by_month(year, month).unwrap_err();
            assert!(matches!(err, JournalError::Validation(_)));
        }

        assert!(selector.is_available());
        assert!(selector.remote().calls.borrow().is_empty());
    }

    #[test]
    fn test_no_implicit_backfill_on_recovery() {
        let (selector, _temp_dir) = setup();
        selector.remote().down.set(true);
        selector
            .create_or_replace("2024-06-01", &EntryDraft::new("stranded", ""))
            .unwrap();

        selector.remote().down.set(false);
        selector.list_by_month(2024, 6).unwrap();

        assert!(matches!(
            selector.get_by_date("2024-06-01"),
            Err(JournalError::NotFound(_))
        ));
    }

    #[test]
    fn test_backfill_pushes_local_entries_once() {
        let (selector, _temp_dir) = setup();
        selector
            .local()
            .create_or_replace("2024-06-01", &EntryDraft::new("written offline", ""))
            .unwrap();

        assert_eq!(selector.backfill().unwrap(), 1);
        assert_eq!(selector.backfill().unwrap(), 1);

        assert_eq!(selector.remote().inner.export_all().unwrap().len(), 1);
        assert_eq!(selector.local().export_all().unwrap().len(), 1);
        assert_eq!(
            selector.get_by_date("2024-06-01").unwrap().title,
            "written offline"
        );
    }

    #[test]
    fn test_backfill_replaces_remote_entry_on_same_date() {
        let (selector, _temp_dir) = setup();
        selector
            .remote()
            .inner
            .create_or_replace("2024-06-01", &EntryDraft::new("server copy", ""))
            .unwrap();
        let offline_id = selector
            .local()
            .create_or_replace("2024-06-01", &EntryDraft::new("offline edit", ""))
            .unwrap();

        assert_eq!(selector.backfill().unwrap(), 1);

        let remote_rows = selector.remote().inner.export_all().unwrap();
        assert_eq!(remote_rows.len(), 1);
        assert_eq!(remote_rows[0].id, offline_id);
        assert_eq!(
            selector.get_by_date("2024-06-01").unwrap().title,
            "offline edit"
        );

        // a second run finds nothing left to replace
        assert_eq!(selector.backfill().unwrap(), 1);
        assert_eq!(selector.remote().inner.export_all().unwrap().len(), 1);
    }

    #[test]
    fn test_backfill_keeps_remote_entries_on_other_dates() {
        let (selector, _temp_dir) = setup();
        selector
            .remote()
            .inner
            .create_or_replace("2024-06-02", &EntryDraft::new("only remote", ""))
            .unwrap();
        selector
            .local()
            .create_or_replace("2024-06-01", &EntryDraft::new("offline", ""))
            .unwrap();

        selector.backfill().unwrap();

        assert_eq!(selector.remote().inner.export_all().unwrap().len(), 2);
    }

    #[test]
    fn test_backfill_fails_when_remote_down() {
        let (selector, _temp_dir) = setup();
        selector
            .local()
            .create_or_replace("2024-06-01", &EntryDraft::default())
            .unwrap();
        selector.remote().down.set(true);

        assert!(selector.backfill().unwrap_err().is_transport());
        assert!(!selector.is_available());
    }

    #[test]
    fn test_offline_mode_never_calls_remote() {
        let temp_dir = TempDir::new().unwrap();
        let remote = FlakyRemote::new(temp_dir.path());
        let local = LocalStore::new(temp_dir.path().join("local.json"));
        let selector = StoreSelector::offline(remote, local);

        selector.list_by_month(2024, 1).unwrap();
        selector
            .create_or_replace("2024-01-02", &EntryDraft::default())
            .unwrap();

        assert!(selector.remote().calls.borrow().is_empty());
        assert!(!selector.is_available());
        assert!(selector.backfill().is_err());
    }
}
