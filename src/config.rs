use crate::error::{JournalError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const CONFIG_FILE_NAME: &str = ".journal.toml";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct JournalConfig {
    #[serde(default)]
    pub server: ServerSettings,

    #[serde(default)]
    pub client: ClientSettings,

    #[serde(default)]
    pub local: LocalSettings,

    #[serde(default)]
    pub log: LogSettings,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerSettings {
    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default = "default_data_file")]
    pub data_file: String,
}

fn default_port() -> u16 {
    3000
}

fn default_data_file() -> String {
    "journal.json".to_string()
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            port: default_port(),
            data_file: default_data_file(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientSettings {
    #[serde(default = "default_api_url")]
    pub api_url: String,

    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_api_url() -> String {
    "http://localhost:3000".to_string()
}

fn default_timeout_secs() -> u64 {
    5
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl ClientSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs.max(1))
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LocalSettings {
    /// Fallback store file; the platform data directory when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LogSettings {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,
}

impl JournalConfig {
    /// Load the nearest `.journal.toml` at or above `start_path`.
    ///
    /// Returns the config together with the directory relative paths in it
    /// resolve against. Without a config file that is `start_path` itself
    /// and every setting takes its default.
    pub fn load(start_path: &Path) -> Result<(Self, PathBuf)> {
        match Self::find_config_file(start_path) {
            Some(config_path) => {
                let config = Self::load_file(&config_path)?;
                let root = config_path
                    .parent()
                    .ok_or_else(|| {
                        JournalError::Config("Config file has no parent directory".to_string())
                    })?
                    .to_path_buf();
                tracing::debug!(path = %config_path.display(), "Loaded config");
                Ok((config, root))
            }
            None => Ok((Self::default(), start_path.to_path_buf())),
        }
    }

    pub fn load_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: JournalConfig = toml::from_str(&content)?;
        Ok(config)
    }

    pub fn find_config_file(start_path: &Path) -> Option<PathBuf> {
        let mut current = start_path.to_path_buf();
        loop {
            let config_path = current.join(CONFIG_FILE_NAME);
            if config_path.is_file() {
                return Some(config_path);
            }
            if !current.pop() {
                return None;
            }
        }
    }

    pub fn data_file_path(&self, root: &Path) -> PathBuf {
        root.join(&self.server.data_file)
    }

    /// Where the fallback store lives.
    pub fn local_path(&self, root: &Path) -> PathBuf {
        match &self.local.path {
            Some(path) => root.join(path),
            None => default_local_dir()
                .unwrap_or_else(|| root.to_path_buf())
                .join(format!("{}.json", crate::storage::LOCAL_STORAGE_KEY)),
        }
    }

    pub fn log_file_path(&self, root: &Path) -> Option<PathBuf> {
        self.log.file.as_ref().map(|f| root.join(f))
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| JournalError::Config(format!("Failed to serialize config: {}", e)))?;
        std::fs::write(path, content)?;
        Ok(())
    }
}

fn default_local_dir() -> Option<PathBuf> {
    directories::ProjectDirs::from("", "", "dailyjournal").map(|d| d.data_local_dir().to_path_buf())
}
