use crate::error::JournalError;
use crate::storage::EntryStore;
use anyhow::{Context, Result};
use colored::Colorize;

use super::CommandContext;
use super::utils::print_entry;

pub fn handle_show(ctx: &CommandContext, date: String, json: bool) -> Result<()> {
    ctx.probe();

    let entry = match ctx.journal.get_by_date(&date) {
        Ok(entry) => entry,
        Err(JournalError::NotFound(_)) if !json => {
            println!("No entry for {}.", date.cyan());
            return Ok(());
        }
        Err(e) => return Err(e).context("Failed to load entry."),
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&entry)?);
    } else {
        print_entry(&entry);
    }
    Ok(())
}
