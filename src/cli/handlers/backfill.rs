use anyhow::{Context, Result};
use colored::Colorize;

use super::CommandContext;

pub fn handle_backfill(ctx: &CommandContext, json: bool) -> Result<()> {
    let count = ctx
        .journal
        .backfill()
        .context("Backfill failed: the server must be reachable.")?;

    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&serde_json::json!({
                "ok": true,
                "count": count,
            }))?
        );
    } else if count == 0 {
        println!("Nothing to backfill.");
    } else {
        println!(
            "{} {} local entries to {}",
            "Backfilled".green(),
            count,
            ctx.journal.remote().base_url().as_str().cyan()
        );
    }
    Ok(())
}
