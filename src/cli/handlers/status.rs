use anyhow::Result;
use colored::Colorize;

use super::CommandContext;
use super::utils::print_status_line;

pub fn handle_status(ctx: &CommandContext, json: bool) -> Result<()> {
    ctx.probe();

    let api_url = ctx.journal.remote().base_url().to_string();
    let local = ctx.journal.local().path().display().to_string();

    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&serde_json::json!({
                "connected": ctx.journal.is_available(),
                "apiUrl": api_url,
                "localFile": local,
            }))?
        );
    } else {
        print_status_line(&ctx.journal);
        println!("Server: {}", api_url.cyan());
        println!("Local:  {}", local.dimmed());
    }
    Ok(())
}
