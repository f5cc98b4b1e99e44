use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;

use dailyjournal::cli::handlers::{self, CommandContext, MonthStep, SaveArgs, StoreOptions};
use dailyjournal::cli::{Cli, Commands};
use dailyjournal::config::JournalConfig;
use dailyjournal::logging;
use dailyjournal::model::EntryDraft;

fn main() -> Result<()> {
    let cli = Cli::parse();
    let cwd = std::env::current_dir()?;

    if let Commands::Init = cli.command {
        logging::init(cli.verbose, None);
        return handlers::handle_init();
    }

    let (config, root) = load_config(&cwd, cli.config.as_deref())?;
    logging::init(cli.verbose, config.log_file_path(&root));

    let command = match cli.command {
        Commands::Serve { port, data_file } => {
            return handlers::handle_serve(&config, &root, port, data_file);
        }
        other => other,
    };

    let options = StoreOptions {
        api_url: cli.api_url,
        local_file: cli.local_file.map(|f| cwd.join(f)),
        offline: cli.offline,
    };
    let ctx = CommandContext::new(config, root, options)?;
    run_client(&ctx, command)
}

fn run_client(ctx: &CommandContext, command: Commands) -> Result<()> {
    match command {
        Commands::Init | Commands::Serve { .. } => Ok(()),
        Commands::Month {
            year,
            month,
            prev,
            next,
            json,
        } => {
            let step = if prev {
                MonthStep::Previous
            } else if next {
                MonthStep::Next
            } else {
                MonthStep::Current
            };
            handlers::handle_month(ctx, year, month, step, json)
        }
        Commands::Show { date, json } => handlers::handle_show(ctx, date, json),
        Commands::Save {
            date,
            title,
            content,
            mood,
            no_mood,
            tag,
            json,
        } => {
            let args = SaveArgs {
                title,
                content,
                mood,
                no_mood,
                tags: tag,
            };
            handlers::handle_save(ctx, date, args, json)
        }
        Commands::Update {
            id,
            title,
            content,
            mood,
            tag,
            json,
        } => {
            let draft = EntryDraft {
                title,
                content: content.unwrap_or_default(),
                mood,
                tags: tag,
            };
            handlers::handle_update(ctx, id, draft, json)
        }
        Commands::Delete {
            target,
            force,
            json,
        } => handlers::handle_delete(ctx, target, force, json),
        Commands::Search { query, json } => handlers::handle_search(ctx, query, json),
        Commands::Export { output } => handlers::handle_export(ctx, output),
        Commands::Import { file, json } => handlers::handle_import(ctx, file, json),
        Commands::Status { json } => handlers::handle_status(ctx, json),
        Commands::Backfill { json } => handlers::handle_backfill(ctx, json),
    }
}

fn load_config(cwd: &Path, explicit: Option<&str>) -> Result<(JournalConfig, PathBuf)> {
    match explicit {
        Some(path) => {
            let path = cwd.join(path);
            let config = JournalConfig::load_file(&path)
                .with_context(|| format!("Failed to load config from {}", path.display()))?;
            let root = path.parent().map(Path::to_path_buf).unwrap_or_else(|| cwd.to_path_buf());
            Ok((config, root))
        }
        None => JournalConfig::load(cwd).context("Failed to load journal configuration"),
    }
}
