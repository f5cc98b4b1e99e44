use crate::config::JournalConfig;
use crate::server::run_server;
use crate::storage::JsonFileStore;
use anyhow::{Context, Result};
use std::path::Path;

pub fn handle_serve(
    config: &JournalConfig,
    root: &Path,
    port: Option<u16>,
    data_file: Option<String>,
) -> Result<()> {
    let port = port.unwrap_or(config.server.port);
    let path = match data_file {
        Some(file) => std::env::current_dir()?.join(file),
        None => config.data_file_path(root),
    };
    let store = JsonFileStore::new(&path);

    println!("Serving {} on http://localhost:{}", path.display(), port);

    tokio::runtime::Runtime::new()?
        .block_on(run_server(store, port))
        .with_context(|| format!("Server on port {} stopped", port))?;
    Ok(())
}
