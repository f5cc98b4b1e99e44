use crate::storage::EntryStore;
use anyhow::{Context, Result};

use super::CommandContext;
use super::utils::print_hit_list;

pub fn handle_search(ctx: &CommandContext, query: String, json: bool) -> Result<()> {
    ctx.probe();

    let hits = ctx.journal.search(&query).context("Search failed.")?;

    if json {
        println!("{}", serde_json::to_string_pretty(&hits)?);
    } else {
        println!("Found {} results for '{}':\n", hits.len(), query.trim());
        print_hit_list(&hits);
    }
    Ok(())
}
