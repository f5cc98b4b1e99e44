use assert_cmd::Command;
use dailyjournal::error::JournalError;
use dailyjournal::import_export::ImportDocument;
use dailyjournal::model::EntryDraft;
use dailyjournal::selector::StoreSelector;
use dailyjournal::storage::{EntryStore, JsonFileStore, LocalStore, RemoteStore};
use predicates::prelude::*;
use std::path::PathBuf;
use std::time::Duration;
use tempfile::TempDir;

/// Start the API server on a free port in a background thread and return
/// its base URL.
fn spawn_server(data_file: PathBuf) -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    listener.set_nonblocking(true).unwrap();
    let addr = listener.local_addr().unwrap();

    std::thread::spawn(move || {
        let runtime = tokio::runtime::Runtime::new().unwrap();
        runtime.block_on(async move {
            let listener = tokio::net::TcpListener::from_std(listener).unwrap();
            dailyjournal::server::serve(listener, JsonFileStore::new(data_file))
                .await
                .unwrap();
        });
    });

    format!("http://{}", addr)
}

fn remote(base: &str) -> RemoteStore {
    RemoteStore::new(base, Duration::from_secs(5)).unwrap()
}

fn journal_cmd() -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("dailyjournal"));
    cmd.env_remove("DAILYJOURNAL_API_URL")
        .env_remove("DAILYJOURNAL_LOCAL_FILE")
        .env_remove("RUST_LOG")
        .env("NO_COLOR", "1");
    cmd
}

#[test]
fn test_remote_store_round_trip() {
    let temp_dir = TempDir::new().unwrap();
    let base = spawn_server(temp_dir.path().join("journal.json"));
    let store = remote(&base);

    let draft = EntryDraft::new("Trip", "Went hiking")
        .with_mood(Some(4))
        .with_tags(vec!["travel".to_string()]);
    let id = store.create_or_replace("2024-03-15", &draft).unwrap();

    let entry = store.get_by_date("2024-03-15").unwrap();
    assert_eq!(entry.id, id);
    assert_eq!(entry.tags, vec!["travel"]);

    let month = store.list_by_month(2024, 3).unwrap();
    assert_eq!(month.len(), 1);
    assert_eq!(month[0].mood, Some(4));

    let hits = store.search("hiking").unwrap();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].snippet, "Went hiking");

    store
        .update(&id, &EntryDraft::new("Trip", "Went hiking, then swam"))
        .unwrap();
    assert_eq!(
        store.get_by_date("2024-03-15").unwrap().content,
        "Went hiking, then swam"
    );

    let exported = store.export_all().unwrap();
    assert_eq!(exported.len(), 1);

    store.delete(&id).unwrap();
    assert!(store.export_all().unwrap().is_empty());

    // the server persisted the canonical document
    let raw = std::fs::read_to_string(temp_dir.path().join("journal.json")).unwrap();
    let json: serde_json::Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(json["entries"], serde_json::json!([]));
}

#[test]
fn test_remote_store_error_mapping() {
    let temp_dir = TempDir::new().unwrap();
    let base = spawn_server(temp_dir.path().join("journal.json"));
    let store = remote(&base);

    assert!(matches!(
        store.get_by_date("2024-01-01"),
        Err(JournalError::NotFound(_))
    ));
    assert!(matches!(
        store.list_by_month(2024, 13),
        Err(JournalError::Validation(_))
    ));
    assert!(matches!(
        store.create_or_replace("2024/01/01", &EntryDraft::default()),
        Err(JournalError::Validation(_))
    ));
    assert!(matches!(
        store.delete("ghost"),
        Err(JournalError::NotFound(_))
    ));
    assert!(store.search("  ").unwrap().is_empty());
}

#[test]
fn test_remote_import_keeps_ids() {
    let temp_dir = TempDir::new().unwrap();
    let base = spawn_server(temp_dir.path().join("journal.json"));
    let store = remote(&base);

    let doc = ImportDocument::from_value(serde_json::json!({
        "entries": [
            {"id": "kept-1", "date": "2023-01-01", "title": "a"},
            {"id": "kept-2", "date": "2023-01-01", "title": "b"}
        ]
    }))
    .unwrap();

    assert_eq!(store.import_entries(&doc.entries).unwrap(), 2);
    assert_eq!(store.import_entries(&doc.entries).unwrap(), 2);
    assert_eq!(store.export_all().unwrap().len(), 2);
}

#[test]
fn test_selector_backfills_offline_entries() {
    let temp_dir = TempDir::new().unwrap();
    let base = spawn_server(temp_dir.path().join("journal.json"));
    let local_path = temp_dir.path().join("local.json");

    // written while the server was unreachable
    let offline = LocalStore::new(&local_path);
    let id = offline
        .create_or_replace("2024-06-01", &EntryDraft::new("written offline", ""))
        .unwrap();

    let selector = StoreSelector::new(remote(&base), LocalStore::new(&local_path));
    selector.list_by_month(2024, 6).unwrap();
    assert!(selector.is_available());
    assert!(selector.get_by_date("2024-06-01").is_err());

    assert_eq!(selector.backfill().unwrap(), 1);

    let entry = selector.get_by_date("2024-06-01").unwrap();
    assert_eq!(entry.id, id);
    assert_eq!(entry.title, "written offline");
    // local copy stays
    assert_eq!(offline.export_all().unwrap().len(), 1);
}

#[test]
fn test_backfill_offline_edit_wins_over_server_entry() {
    let temp_dir = TempDir::new().unwrap();
    let base = spawn_server(temp_dir.path().join("journal.json"));
    let local_path = temp_dir.path().join("local.json");

    remote(&base)
        .create_or_replace("2024-06-01", &EntryDraft::new("server copy", ""))
        .unwrap();
    let offline_id = LocalStore::new(&local_path)
        .create_or_replace("2024-06-01", &EntryDraft::new("offline edit", ""))
        .unwrap();

    let selector = StoreSelector::new(remote(&base), LocalStore::new(&local_path));
    assert_eq!(selector.backfill().unwrap(), 1);

    let rows = remote(&base).export_all().unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].id, offline_id);
    assert_eq!(
        selector.get_by_date("2024-06-01").unwrap().title,
        "offline edit"
    );
}

#[test]
fn test_cli_against_live_server() {
    let temp_dir = TempDir::new().unwrap();
    let base = spawn_server(temp_dir.path().join("journal.json"));
    let local_file = temp_dir.path().join("dj_entries_v1.json");

    journal_cmd()
        .current_dir(temp_dir.path())
        .args(["--api-url", &base, "--local-file"])
        .arg(&local_file)
        .args(["save", "2024-03-15", "-t", "Trip", "-c", "Went hiking"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Created"));

    journal_cmd()
        .current_dir(temp_dir.path())
        .env("DAILYJOURNAL_API_URL", &base)
        .env("DAILYJOURNAL_LOCAL_FILE", &local_file)
        .arg("status")
        .assert()
        .success()
        .stdout(predicate::str::contains("Connected"));

    // the entry went to the server, not the fallback
    assert!(!local_file.exists());
    assert_eq!(remote(&base).export_all().unwrap().len(), 1);

    // an offline write, then an explicit backfill
    journal_cmd()
        .current_dir(temp_dir.path())
        .args(["--offline", "--local-file"])
        .arg(&local_file)
        .args(["save", "2024-03-16", "-t", "Rest"])
        .assert()
        .success();

    journal_cmd()
        .current_dir(temp_dir.path())
        .args(["--api-url", &base, "--local-file"])
        .arg(&local_file)
        .arg("backfill")
        .assert()
        .success()
        .stdout(predicate::str::contains("Backfilled 1"));

    journal_cmd()
        .current_dir(temp_dir.path())
        .args(["--api-url", &base, "--local-file"])
        .arg(&local_file)
        .args(["month", "2024", "3"])
        .assert()
        .success()
        .stdout(predicate::str::contains("2 entries"))
        .stdout(predicate::str::contains("Connected"));
}
