use crate::config::{CONFIG_FILE_NAME, JournalConfig};
use crate::error::JournalError;
use anyhow::Result;
use colored::Colorize;

pub fn handle_init() -> Result<()> {
    let cwd = std::env::current_dir()?;
    let config_path = cwd.join(CONFIG_FILE_NAME);

    if config_path.exists() {
        return Err(JournalError::AlreadyInitialized(config_path.display().to_string()).into());
    }

    let config = JournalConfig::default();
    config.save(&config_path)?;

    println!(
        "{} journal config in {}",
        "Initialized".green(),
        cwd.display()
    );
    println!("  Config:  {}", config_path.display());
    println!("  Journal: {}", config.data_file_path(&cwd).display());
    println!("  Server:  {}", config.client.api_url);
    println!("  Offline: {}", config.local_path(&cwd).display());

    Ok(())
}
