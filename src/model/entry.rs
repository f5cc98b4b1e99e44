use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single journal entry. At most one exists per date in a store
/// created through `create_or_replace`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Entry {
    pub id: String,

    /// ISO calendar date, `YYYY-MM-DD`.
    pub date: String,

    #[serde(default)]
    pub title: String,

    #[serde(default)]
    pub content: String,

    #[serde(default)]
    pub mood: Option<i64>,

    #[serde(default)]
    pub tags: Vec<String>,

    pub created_at: DateTime<Utc>,

    pub updated_at: DateTime<Utc>,
}

impl Entry {
    pub fn new(id: String, date: String, draft: EntryDraft) -> Self {
        let now = Utc::now();
        Self {
            id,
            date,
            title: draft.title,
            content: draft.content,
            mood: draft.mood,
            tags: draft.tags,
            created_at: now,
            updated_at: now,
        }
    }

    /// Overwrite the editable fields. `id`, `date` and `created_at` never change.
    pub fn apply(&mut self, draft: &EntryDraft) {
        self.title = draft.title.clone();
        self.content = draft.content.clone();
        self.mood = draft.mood;
        self.tags = draft.tags.clone();
        self.touch();
    }

    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }

    pub fn month_summary(&self) -> MonthSummary {
        MonthSummary {
            id: self.id.clone(),
            date: self.date.clone(),
            mood: self.mood,
        }
    }

    pub fn search_hit(&self) -> SearchHit {
        SearchHit {
            id: self.id.clone(),
            date: self.date.clone(),
            title: self.title.clone(),
            snippet: snippet(&self.content),
            mood: self.mood,
        }
    }
}

/// The user-editable part of an entry, as sent by a save or update.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EntryDraft {
    #[serde(default)]
    pub title: String,

    #[serde(default)]
    pub content: String,

    #[serde(default)]
    pub mood: Option<i64>,

    #[serde(default)]
    pub tags: Vec<String>,
}

impl EntryDraft {
    pub fn new(title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            content: content.into(),
            ..Self::default()
        }
    }

    pub fn with_mood(mut self, mood: Option<i64>) -> Self {
        self.mood = mood;
        self
    }

    pub fn with_tags(mut self, tags: Vec<String>) -> Self {
        self.tags = tags;
        self
    }
}

/// Calendar-dot projection returned by month listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthSummary {
    pub id: String,
    pub date: String,
    pub mood: Option<i64>,
}

/// Search result projection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchHit {
    pub id: String,
    pub date: String,
    pub title: String,
    pub snippet: String,
    pub mood: Option<i64>,
}

/// Maximum number of characters of content carried in a search snippet.
pub const SNIPPET_LENGTH: usize = 200;

fn snippet(content: &str) -> String {
    content.chars().take(SNIPPET_LENGTH).collect()
}
