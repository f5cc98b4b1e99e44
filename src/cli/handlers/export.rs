use crate::import_export::{ExportDocument, export_filename};
use crate::storage::EntryStore;
use anyhow::{Context, Result};
use colored::Colorize;

use super::CommandContext;

pub fn handle_export(ctx: &CommandContext, output: Option<String>) -> Result<()> {
    ctx.probe();

    let entries = ctx.journal.export_all().context("Export failed.")?;
    let document = ExportDocument::new(&entries);
    let content = document.to_json_pretty()?;

    let output =
        output.unwrap_or_else(|| export_filename(chrono::Local::now().date_naive()));
    if output == "-" {
        println!("{}", content);
        return Ok(());
    }

    std::fs::write(&output, content)
        .with_context(|| format!("Failed to write export to {}", output))?;
    println!(
        "{} {} entries to {}",
        "Exported".green(),
        document.entries.len(),
        output.cyan()
    );
    Ok(())
}
