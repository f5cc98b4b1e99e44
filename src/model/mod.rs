//! Data models for the journal.
//!
//! - [`Entry`]: a dated journal entry, the only persisted entity
//! - [`EntryDraft`]: the editable fields sent on save and update
//! - [`MonthSummary`]: the `{id, date, mood}` projection behind calendar dots
//! - [`SearchHit`]: the `{id, date, title, snippet, mood}` search projection

mod entry;

pub use entry::{Entry, EntryDraft, MonthSummary, SNIPPET_LENGTH, SearchHit};
