//! JSON HTTP API over the canonical journal file.
//!
//! ## Routes
//!
//! - `GET /api/entries?date=YYYY-MM-DD`: the entry for a date
//! - `GET /api/entries/by-month?year=Y&month=M`: `{id, date, mood}` rows
//! - `GET /api/entries/search?q=...`: up to 100 hits, newest first
//! - `POST /api/entries`: create or replace the entry for a date
//! - `PUT /api/entries/{id}` / `DELETE /api/entries/{id}`
//! - `GET /api/export`, `POST /api/import`
//!
//! Errors are answered as `{"error": "..."}` with status 400 or 404.

mod error;
mod routes;

pub use error::ApiError;

use crate::error::{JournalError, Result};
use crate::storage::JsonFileStore;
use axum::{
    Router,
    extract::DefaultBodyLimit,
    routing::{get, post, put},
};
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use tower_http::trace::TraceLayer;

/// Largest accepted request body (import documents included).
pub const BODY_LIMIT: usize = 5 * 1024 * 1024;

/// Shared handler state. Requests take turns on the one store.
#[derive(Clone)]
pub struct AppState {
    store: Arc<Mutex<JsonFileStore>>,
}

impl AppState {
    pub fn new(store: JsonFileStore) -> Self {
        Self {
            store: Arc::new(Mutex::new(store)),
        }
    }

    /// Run `f` against the store on the blocking pool.
    async fn with_store<T, F>(&self, f: F) -> std::result::Result<T, ApiError>
    where
        T: Send + 'static,
        F: FnOnce(&JsonFileStore) -> Result<T> + Send + 'static,
    {
        let store = Arc::clone(&self.store);
        let outcome = tokio::task::spawn_blocking(move || {
            let guard = store
                .lock()
                .map_err(|_| JournalError::Storage("Journal store lock poisoned".to_string()))?;
            f(&guard)
        })
        .await
        .map_err(|e| ApiError::internal(format!("Request task failed: {}", e)))?;
        Ok(outcome?)
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route(
            "/api/entries",
            get(routes::get_entry).post(routes::create_entry),
        )
        .route("/api/entries/by-month", get(routes::list_by_month))
        .route("/api/entries/search", get(routes::search))
        .route(
            "/api/entries/{id}",
            put(routes::update_entry).delete(routes::delete_entry),
        )
        .route("/api/export", get(routes::export))
        .route("/api/import", post(routes::import))
        .fallback(routes::not_found)
        .with_state(state)
        .layer(DefaultBodyLimit::max(BODY_LIMIT))
        .layer(TraceLayer::new_for_http())
}

/// Serve the API on an already bound listener until Ctrl-C.
pub async fn serve(listener: tokio::net::TcpListener, store: JsonFileStore) -> Result<()> {
    let app = router(AppState::new(store));
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

pub async fn run_server(store: JsonFileStore, port: u16) -> Result<()> {
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(data_file = %store.path().display(), "DailyJournal server running on http://localhost:{}", port);
    serve(listener, store).await
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        tracing::info!("Shutting down");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::{Body, to_bytes},
        http::{Request, StatusCode, header},
    };
    use serde_json::{Value, json};
    use tempfile::TempDir;
    use tower::ServiceExt;

    fn setup() -> (Router, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let store = JsonFileStore::new(temp_dir.path().join("journal.json"));
        (router(AppState::new(store)), temp_dir)
    }

    async fn call(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, body)
    }

    fn get(uri: &str) -> Request<Body> {
        Request::get(uri).body(Body::empty()).unwrap()
    }

    fn with_json(method: &str, uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn test_create_then_fetch_by_date_and_month() {
        let (app, _temp_dir) = setup();

        let (status, body) = call(
            &app,
            with_json(
                "POST",
                "/api/entries",
                json!({"date": "2024-03-15", "title": "Trip", "content": "Went hiking", "mood": 4, "tags": ["travel"]}),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        let id = body["id"].as_str().unwrap().to_string();

        let (status, entry) = call(&app, get("/api/entries?date=2024-03-15")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(entry["id"], id);
        assert_eq!(entry["tags"], json!(["travel"]));

        let (_, month) = call(&app, get("/api/entries/by-month?year=2024&month=3")).await;
        assert_eq!(month, json!([{"id": id, "date": "2024-03-15", "mood": 4}]));
    }

    #[tokio::test]
    async fn test_error_bodies() {
        let (app, _temp_dir) = setup();

        let (status, body) = call(&app, get("/api/entries")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Invalid or missing date (YYYY-MM-DD)");

        let (status, body) = call(&app, get("/api/entries?date=2024-01-01")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "Not found");

        let (status, body) = call(&app, get("/api/entries/by-month?year=2024&month=13")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Invalid year or month");

        let (status, body) = call(&app, get("/api/entries/by-month?year=abc&month=1")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Invalid year or month");

        let (status, _) = call(
            &app,
            with_json("POST", "/api/entries", json!({"date": "15/03/2024"})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, body) = call(&app, with_json("POST", "/api/import", json!({"nope": 1}))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Invalid payload");
    }

    #[tokio::test]
    async fn test_update_and_delete() {
        let (app, _temp_dir) = setup();
        let (_, body) = call(
            &app,
            with_json("POST", "/api/entries", json!({"date": "2024-01-01", "title": "a"})),
        )
        .await;
        let id = body["id"].as_str().unwrap().to_string();

        let (status, body) = call(
            &app,
            with_json("PUT", &format!("/api/entries/{}", id), json!({"title": "b"})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"ok": true}));

        let (status, _) = call(
            &app,
            with_json("PUT", "/api/entries/missing", json!({"title": "b"})),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let request = Request::delete(format!("/api/entries/{}", id))
            .body(Body::empty())
            .unwrap();
        let (status, body) = call(&app, request).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"ok": true}));

        let (status, _) = call(&app, get("/api/entries?date=2024-01-01")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_search_blank_query_is_empty() {
        let (app, _temp_dir) = setup();
        call(
            &app,
            with_json("POST", "/api/entries", json!({"date": "2024-01-01", "content": "rainy day"})),
        )
        .await;

        let (_, hits) = call(&app, get("/api/entries/search?q=%20%20")).await;
        assert_eq!(hits, json!([]));

        let (_, hits) = call(&app, get("/api/entries/search?q=RAINY")).await;
        assert_eq!(hits.as_array().unwrap().len(), 1);
        assert_eq!(hits[0]["snippet"], "rainy day");
    }

    #[tokio::test]
    async fn test_export_sets_download_name() {
        let (app, _temp_dir) = setup();
        let response = app.clone().oneshot(get("/api/export")).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let disposition = response
            .headers()
            .get(header::CONTENT_DISPOSITION)
            .unwrap()
            .to_str()
            .unwrap()
            .to_string();
        assert!(disposition.starts_with("attachment; filename=journal-export-"));
        assert!(disposition.ends_with(".json"));
    }

    #[tokio::test]
    async fn test_import_counts_and_keeps_ids() {
        let (app, _temp_dir) = setup();

        let (status, body) = call(
            &app,
            with_json(
                "POST",
                "/api/import",
                json!({"entries": [
                    {"id": "a1", "date": "2023-05-01", "title": "one"},
                    {"date": "2023-05-02"}
                ]}),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"ok": true, "count": 2}));

        let (_, entry) = call(&app, get("/api/entries?date=2023-05-01")).await;
        assert_eq!(entry["id"], "a1");
    }
}
