use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "dailyjournal")]
#[command(
    author,
    version,
    about = "A calendar-driven personal journal with an offline fallback store"
)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Path to config file (searches upward for .journal.toml by default)
    #[arg(long, global = true)]
    pub config: Option<String>,

    /// Base URL of the journal API server (overrides config)
    #[arg(long, global = true, env = "DAILYJOURNAL_API_URL")]
    pub api_url: Option<String>,

    /// Path to the local fallback store (overrides config)
    #[arg(long, global = true, env = "DAILYJOURNAL_LOCAL_FILE")]
    pub local_file: Option<String>,

    /// Never contact the API server; read and write the local store only
    #[arg(long, global = true)]
    pub offline: bool,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Write a default .journal.toml in the current directory
    Init,

    /// Run the journal API server
    Serve {
        /// Port to listen on
        #[arg(short, long, env = "PORT")]
        port: Option<u16>,

        /// Journal file to serve (overrides config)
        #[arg(long)]
        data_file: Option<String>,
    },

    /// Show a month as a calendar with entry markers
    #[command(visible_alias = "cal")]
    Month {
        /// Year (defaults to the current year)
        #[arg(requires = "month")]
        year: Option<i32>,

        /// Month, 1-12 (defaults to the current month)
        month: Option<u32>,

        /// Show the month before the given one
        #[arg(long, conflicts_with = "next")]
        prev: bool,

        /// Show the month after the given one
        #[arg(long)]
        next: bool,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show the entry for a date
    Show {
        /// Date (YYYY-MM-DD)
        date: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Write the entry for a date, updating it if one exists
    #[command(visible_alias = "write")]
    Save {
        /// Date (YYYY-MM-DD)
        date: String,

        /// Entry title
        #[arg(short, long)]
        title: Option<String>,

        /// Entry text (use '-' to read from stdin)
        #[arg(short = 'c', long)]
        content: Option<String>,

        /// Mood rating
        #[arg(short, long)]
        mood: Option<i64>,

        /// Clear the mood
        #[arg(long, conflicts_with = "mood")]
        no_mood: bool,

        /// Tags (repeatable, or comma separated)
        #[arg(long)]
        tag: Vec<String>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Replace the title, text, mood and tags of an entry by id
    Update {
        /// Entry ID
        id: String,

        /// Entry title
        #[arg(short, long, default_value = "")]
        title: String,

        /// Entry text (use '-' to read from stdin)
        #[arg(short = 'c', long)]
        content: Option<String>,

        /// Mood rating
        #[arg(short, long)]
        mood: Option<i64>,

        /// Tags (repeatable, or comma separated)
        #[arg(long)]
        tag: Vec<String>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Delete an entry by id or by date
    #[command(visible_alias = "rm")]
    Delete {
        /// Entry ID or date (YYYY-MM-DD)
        target: String,

        /// Skip the confirmation prompt
        #[arg(short, long)]
        force: bool,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Search entry titles and text
    #[command(visible_alias = "find")]
    Search {
        /// Search query (case-insensitive)
        query: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Export all entries as a JSON document
    Export {
        /// Output file ('-' for stdout; defaults to journal-export-<date>.json)
        #[arg(short, long)]
        output: Option<String>,
    },

    /// Import entries from an export document
    Import {
        /// Path to the document
        file: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show whether the API server is reachable
    Status {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Copy entries written offline into the API server's store
    Backfill {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}
