use crate::import_export::ImportDocument;
use crate::storage::EntryStore;
use anyhow::{Context, Result};
use colored::Colorize;

use super::CommandContext;

pub fn handle_import(ctx: &CommandContext, file: String, json: bool) -> Result<()> {
    let text = std::fs::read_to_string(&file)
        .with_context(|| format!("Failed to read {}", file))?;
    let document = ImportDocument::from_json(&text).context("Import failed.")?;

    ctx.probe();
    let count = ctx
        .journal
        .import_entries(&document.entries)
        .context("Import failed.")?;

    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&serde_json::json!({
                "ok": true,
                "count": count,
                "connected": ctx.journal.is_available(),
            }))?
        );
    } else {
        println!("{} {} entries from {}", "Imported".green(), count, file.cyan());
    }
    Ok(())
}
