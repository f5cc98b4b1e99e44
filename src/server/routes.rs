use super::{AppState, error::ApiError};
use crate::error::JournalError;
use crate::import_export::{ExportDocument, ImportDocument, export_filename};
use crate::model::{Entry, EntryDraft, MonthSummary, SearchHit};
use crate::storage::EntryStore;
use crate::validation;
use axum::{
    Json,
    extract::{Path, Query, State, rejection::JsonRejection},
    http::{StatusCode, header},
    response::IntoResponse,
};
use serde::Deserialize;
use serde_json::{Value, json};

#[derive(Debug, Deserialize)]
pub struct DateQuery {
    date: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct MonthQuery {
    year: Option<String>,
    month: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    q: String,
}

#[derive(Debug, Deserialize)]
pub struct CreateRequest {
    date: Option<String>,
    #[serde(flatten)]
    draft: EntryDraft,
}

fn parse_year_month(query: &MonthQuery) -> Result<(i32, u32), ApiError> {
    let invalid = || ApiError::bad_request("Invalid year or month");
    let year = query
        .year
        .as_deref()
        .and_then(|y| y.trim().parse::<i32>().ok())
        .ok_or_else(invalid)?;
    let month = query
        .month
        .as_deref()
        .and_then(|m| m.trim().parse::<u32>().ok())
        .ok_or_else(invalid)?;
    validation::validate_year_month(year, month)?;
    Ok((year, month))
}

pub async fn get_entry(
    State(state): State<AppState>,
    Query(query): Query<DateQuery>,
) -> Result<Json<Entry>, ApiError> {
    let date = validation::require_date(query.date.as_deref())?.to_string();
    let entry = state.with_store(move |store| store.get_by_date(&date)).await?;
    Ok(Json(entry))
}

pub async fn list_by_month(
    State(state): State<AppState>,
    Query(query): Query<MonthQuery>,
) -> Result<Json<Vec<MonthSummary>>, ApiError> {
    let (year, month) = parse_year_month(&query)?;
    let rows = state
        .with_store(move |store| store.list_by_month(year, month))
        .await?;
    Ok(Json(rows))
}

pub async fn search(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> Result<Json<Vec<SearchHit>>, ApiError> {
    let hits = state.with_store(move |store| store.search(&query.q)).await?;
    Ok(Json(hits))
}

pub async fn create_entry(
    State(state): State<AppState>,
    payload: Result<Json<CreateRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(request) = payload.map_err(|e| ApiError::bad_request(e.body_text()))?;
    let date = validation::require_date(request.date.as_deref())?.to_string();
    let draft = request.draft;
    let id = state
        .with_store(move |store| store.create_or_replace(&date, &draft))
        .await?;
    Ok((StatusCode::CREATED, Json(json!({ "id": id }))))
}

pub async fn update_entry(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<EntryDraft>, JsonRejection>,
) -> Result<Json<Value>, ApiError> {
    let Json(draft) = payload.map_err(|e| ApiError::bad_request(e.body_text()))?;
    state.with_store(move |store| store.update(&id, &draft)).await?;
    Ok(Json(json!({ "ok": true })))
}

pub async fn delete_entry(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    state.with_store(move |store| store.delete(&id)).await?;
    Ok(Json(json!({ "ok": true })))
}

pub async fn export(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let entries = state.with_store(|store| store.export_all()).await?;
    let filename = export_filename(chrono::Local::now().date_naive());
    let disposition = format!("attachment; filename={}", filename);
    Ok((
        [(header::CONTENT_DISPOSITION, disposition)],
        Json(ExportDocument { entries }),
    ))
}

pub async fn import(
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Json<Value>, ApiError> {
    let Json(value) = payload.map_err(|_| ApiError::bad_request("Invalid payload"))?;
    let document = ImportDocument::from_value(value)?;
    let count = state
        .with_store(move |store| store.import_entries(&document.entries))
        .await?;
    Ok(Json(json!({ "ok": true, "count": count })))
}

pub async fn not_found() -> ApiError {
    ApiError::from(JournalError::NotFound("route".to_string()))
}
