use crate::error::JournalError;
use crate::model::EntryDraft;
use crate::storage::EntryStore;
use crate::validation;
use anyhow::{Context, Result};
use colored::Colorize;

use super::CommandContext;
use super::utils::{parse_tags, resolve_content};

/// Field changes requested on the command line. Unset fields keep the
/// value of the entry being edited.
pub struct SaveArgs {
    pub title: Option<String>,
    pub content: Option<String>,
    pub mood: Option<i64>,
    pub no_mood: bool,
    pub tags: Vec<String>,
}

impl SaveArgs {
    fn apply_to(self, mut draft: EntryDraft) -> Result<EntryDraft> {
        if let Some(title) = self.title {
            draft.title = title.trim().to_string();
        }
        if let Some(content) = resolve_content(self.content)? {
            draft.content = content;
        }
        if self.no_mood {
            draft.mood = None;
        } else if self.mood.is_some() {
            draft.mood = self.mood;
        }
        if !self.tags.is_empty() {
            draft.tags = parse_tags(&self.tags);
        }
        Ok(draft)
    }
}

/// Save the entry for `date`: the existing entry is updated in place,
/// otherwise a new one is created.
pub fn handle_save(ctx: &CommandContext, date: String, args: SaveArgs, json: bool) -> Result<()> {
    validation::validate_date(&date)?;
    ctx.probe();

    let existing = match ctx.journal.get_by_date(&date) {
        Ok(entry) => Some(entry),
        Err(JournalError::NotFound(_)) => None,
        Err(e) => return Err(e).context("Failed to save entry."),
    };

    let (id, action) = match existing {
        Some(entry) => {
            let base = EntryDraft {
                title: entry.title,
                content: entry.content,
                mood: entry.mood,
                tags: entry.tags,
            };
            let draft = args.apply_to(base)?;
            match ctx.journal.update(&entry.id, &draft) {
                Ok(()) => (entry.id, "updated"),
                // remote went away between read and write; the local store
                // never saw this id
                Err(JournalError::NotFound(_)) if !ctx.journal.is_available() => {
                    let id = ctx
                        .journal
                        .create_or_replace(&date, &draft)
                        .context("Failed to save entry.")?;
                    (id, "created")
                }
                Err(e) => return Err(e).context("Failed to save entry."),
            }
        }
        None => {
            let draft = args.apply_to(EntryDraft::default())?;
            let id = ctx
                .journal
                .create_or_replace(&date, &draft)
                .context("Failed to save entry.")?;
            (id, "created")
        }
    };

    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&serde_json::json!({
                "action": action,
                "id": id,
                "date": date,
                "connected": ctx.journal.is_available(),
            }))?
        );
    } else {
        let verb = if action == "created" {
            "Created".green()
        } else {
            "Updated".green()
        };
        println!("{} {} {}", verb, date.cyan(), id.dimmed());
        if !ctx.journal.is_available() {
            println!("{}", "Saved to the local store (offline).".yellow());
        }
    }
    Ok(())
}
