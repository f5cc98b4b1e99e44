mod backfill;
mod delete;
mod export;
mod import;
mod init;
mod month;
mod save;
mod search;
mod serve;
mod show;
mod status;
mod update;
mod utils;

pub use backfill::handle_backfill;
pub use delete::handle_delete;
pub use export::handle_export;
pub use import::handle_import;
pub use init::handle_init;
pub use month::{MonthStep, handle_month};
pub use save::{SaveArgs, handle_save};
pub use search::handle_search;
pub use serve::handle_serve;
pub use show::handle_show;
pub use status::handle_status;
pub use update::handle_update;

use crate::config::JournalConfig;
use crate::selector::StoreSelector;
use crate::storage::{EntryStore, LocalStore, RemoteStore};
use anyhow::{Context, Result};
use chrono::Datelike;
use std::path::PathBuf;

/// The store every client command talks to.
pub type Journal = StoreSelector<RemoteStore, LocalStore>;

/// Store overrides taken from global flags.
#[derive(Debug, Clone, Default)]
pub struct StoreOptions {
    pub api_url: Option<String>,
    pub local_file: Option<PathBuf>,
    pub offline: bool,
}

/// Common context passed to all client command handlers
pub struct CommandContext {
    pub config: JournalConfig,
    pub root: PathBuf,
    pub journal: Journal,
}

impl CommandContext {
    pub fn new(mut config: JournalConfig, root: PathBuf, options: StoreOptions) -> Result<Self> {
        if let Some(url) = options.api_url {
            config.client.api_url = url;
        }

        let remote = RemoteStore::new(&config.client.api_url, config.client.timeout())
            .with_context(|| format!("Cannot use API URL '{}'", config.client.api_url))?;
        let local_path = options
            .local_file
            .unwrap_or_else(|| config.local_path(&root));
        let local = LocalStore::new(local_path);

        let journal = if options.offline {
            StoreSelector::offline(remote, local)
        } else {
            StoreSelector::new(remote, local)
        };
        Ok(Self {
            config,
            root,
            journal,
        })
    }

    /// Check remote availability with the current month's listing, the same
    /// request a calendar render starts with.
    pub fn probe(&self) {
        let today = chrono::Local::now().date_naive();
        if let Err(e) = self.journal.list_by_month(today.year(), today.month()) {
            tracing::warn!(error = %e, "Availability probe failed");
        }
    }
}
