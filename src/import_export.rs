//! Import and export of the portable `{ "entries": [...] }` document.

use crate::error::{JournalError, Result};
use crate::model::Entry;
use crate::search;
use crate::storage::generate_id;
use crate::validation;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// Full snapshot of a store, newest date first.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExportDocument {
    pub entries: Vec<Entry>,
}

impl ExportDocument {
    pub fn new(entries: &[Entry]) -> Self {
        Self {
            entries: search::snapshot(entries),
        }
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Suggested download name for an export taken on `day`.
pub fn export_filename(day: NaiveDate) -> String {
    format!("journal-export-{}.json", day.format("%Y-%m-%d"))
}

/// One element of an import document. Everything except the date may be
/// missing and is defaulted on merge.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportedEntry {
    #[serde(
        default,
        deserialize_with = "blank_as_none",
        skip_serializing_if = "Option::is_none"
    )]
    pub id: Option<String>,

    pub date: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,

    #[serde(default)]
    pub mood: Option<i64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,

    #[serde(
        default,
        deserialize_with = "timestamp_or_blank",
        skip_serializing_if = "Option::is_none"
    )]
    pub created_at: Option<DateTime<Utc>>,
}

/// Empty or whitespace-only strings count as absent.
fn blank_as_none<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value.filter(|s| !s.trim().is_empty()))
}

/// RFC 3339 timestamp; null or blank counts as absent.
fn timestamp_or_blank<'de, D>(
    deserializer: D,
) -> std::result::Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    match blank_as_none(deserializer)? {
        None => Ok(None),
        Some(text) => DateTime::parse_from_rfc3339(text.trim())
            .map(|t| Some(t.with_timezone(&Utc)))
            .map_err(serde::de::Error::custom),
    }
}

impl From<&Entry> for ImportedEntry {
    fn from(entry: &Entry) -> Self {
        Self {
            id: Some(entry.id.clone()),
            date: entry.date.clone(),
            title: Some(entry.title.clone()),
            content: Some(entry.content.clone()),
            mood: entry.mood,
            tags: Some(entry.tags.clone()),
            created_at: Some(entry.created_at),
        }
    }
}

impl ImportedEntry {
    /// Materialize a full entry, generating an id when the document had none.
    fn into_entry(self, now: DateTime<Utc>) -> Entry {
        Entry {
            id: self.id.unwrap_or_else(generate_id),
            date: self.date,
            title: self.title.unwrap_or_default(),
            content: self.content.unwrap_or_default(),
            mood: self.mood,
            tags: self.tags.unwrap_or_default(),
            created_at: self.created_at.unwrap_or(now),
            updated_at: now,
        }
    }
}

/// A validated import payload.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ImportDocument {
    pub entries: Vec<ImportedEntry>,
}

impl ImportDocument {
    pub fn from_json(text: &str) -> Result<Self> {
        let value: serde_json::Value = serde_json::from_str(text)
            .map_err(|e| JournalError::Validation(format!("Invalid payload: {}", e)))?;
        Self::from_value(value)
    }

    /// Validate an arbitrary JSON value as an import payload.
    ///
    /// The whole document is rejected if `entries` is not an array or any
    /// element lacks a valid date, so a bad file never half-applies.
    pub fn from_value(value: serde_json::Value) -> Result<Self> {
        let Some(items) = value.get("entries").and_then(|v| v.as_array()) else {
            return Err(JournalError::Validation("Invalid payload".to_string()));
        };

        let mut entries = Vec::with_capacity(items.len());
        for (index, item) in items.iter().enumerate() {
            let imported: ImportedEntry = serde_json::from_value(item.clone()).map_err(|e| {
                JournalError::Validation(format!("Invalid entry at index {}: {}", index, e))
            })?;
            validation::validate_date(&imported.date).map_err(|e| {
                JournalError::Validation(format!("Invalid entry at index {}: {}", index, e))
            })?;
            if let Some(id) = imported.id.as_deref() {
                validation::validate_id(id)?;
            }
            entries.push(imported);
        }
        Ok(Self { entries })
    }

    pub fn from_entries(entries: &[Entry]) -> Self {
        Self {
            entries: entries.iter().map(ImportedEntry::from).collect(),
        }
    }
}

/// Merge imported entries into `entries`, keyed by id.
///
/// An element whose id already exists replaces that row; everything else is
/// appended. Dates are not de-duplicated here. Returns how many elements
/// were processed.
pub fn merge_entries(entries: &mut Vec<Entry>, incoming: &[ImportedEntry]) -> usize {
    let now = Utc::now();
    let mut count = 0;
    for imported in incoming {
        let item = imported.clone().into_entry(now);
        match entries.iter().position(|e| e.id == item.id) {
            Some(idx) => entries[idx] = item,
            None => entries.push(item),
        }
        count += 1;
    }
    tracing::debug!(count, "Merged imported entries");
    count
}
