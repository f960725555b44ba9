//! CLI error types

use thiserror::Error;
use tokenforge_core::ForgeError;

#[derive(Debug, Error)]
pub enum CliError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Configuration error: {0}")]
    Config(#[from] toml::de::Error),

    #[error("TokenSpec rejected: {0} validation error(s)")]
    Rejected(usize),

    #[error("Generation error: {0}")]
    Forge(#[from] ForgeError),
}

/// CLI result type
pub type CliResult<T> = Result<T, CliError>;
