use crate::config::ConfigError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CommandError {
    #[error("Failed to reload configuration: {0}")]
    Reload(#[from] ConfigError),
    #[error("Unknown command: {name}")]
    UnknownCommand { name: String },
}

pub type CommandResult<T> = Result<T, CommandError>;
