use crate::storage::EntryStore;
use crate::validation;
use anyhow::{Context, Result};
use colored::Colorize;
use std::io::{self, Write};

use super::CommandContext;

/// Delete by id, or by date when `target` is a date.
pub fn handle_delete(ctx: &CommandContext, target: String, force: bool, json: bool) -> Result<()> {
    ctx.probe();

    let (id, label) = if validation::validate_date(&target).is_ok() {
        let entry = ctx
            .journal
            .get_by_date(&target)
            .context("Failed to delete entry.")?;
        let label = format!("{} ({})", target, entry.id);
        (entry.id, label)
    } else {
        validation::validate_id(&target)?;
        (target.clone(), target)
    };

    if !force && !json {
        print!("Delete entry {}? [y/N] ", label.cyan());
        io::stdout().flush()?;
        let mut input = String::new();
        io::stdin().read_line(&mut input)?;
        if !input.trim().eq_ignore_ascii_case("y") {
            println!("Cancelled.");
            return Ok(());
        }
    }

    ctx.journal.delete(&id).context("Failed to delete entry.")?;

    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&serde_json::json!({
                "action": "deleted",
                "id": id
            }))?
        );
    } else {
        println!("{} {}", "Deleted".red(), label.cyan());
    }
    Ok(())
}
