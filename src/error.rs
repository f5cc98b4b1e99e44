use thiserror::Error;

#[derive(Error, Debug)]
pub enum JournalError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Entry not found: {0}")]
    NotFound(String),

    #[error("Remote store unreachable: {0}")]
    Transport(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Journal already initialized at {0}")]
    AlreadyInitialized(String),
}

impl JournalError {
    /// Whether the error means the remote store could not be reached,
    /// as opposed to the remote rejecting the request.
    pub fn is_transport(&self) -> bool {
        matches!(self, JournalError::Transport(_))
    }
}

pub type Result<T> = std::result::Result<T, JournalError>;
