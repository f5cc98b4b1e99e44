use crate::model::EntryDraft;
use crate::storage::EntryStore;
use crate::validation;
use anyhow::{Context, Result};
use colored::Colorize;

use super::CommandContext;
use super::utils::{parse_tags, resolve_content};

/// Replace the editable fields of entry `id`. Anything not given is cleared.
pub fn handle_update(
    ctx: &CommandContext,
    id: String,
    draft: EntryDraft,
    json: bool,
) -> Result<()> {
    validation::validate_id(&id)?;
    ctx.probe();

    let draft = EntryDraft {
        title: draft.title.trim().to_string(),
        content: resolve_content(Some(draft.content))?.unwrap_or_default(),
        mood: draft.mood,
        tags: parse_tags(&draft.tags),
    };

    ctx.journal
        .update(&id, &draft)
        .context("Failed to save entry.")?;

    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&serde_json::json!({
                "action": "updated",
                "id": id,
                "connected": ctx.journal.is_available(),
            }))?
        );
    } else {
        println!("{} {}", "Updated".green(), id.cyan());
    }
    Ok(())
}
