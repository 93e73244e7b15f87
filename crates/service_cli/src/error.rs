//! Error types for the command line front end.

use pricer_pricing::mc::ConfigError;
use thiserror::Error;

/// CLI error.
#[derive(Debug, Error)]
pub enum CliError {
    /// Configuration file does not exist.
    #[error("File not found: {0}")]
    FileNotFound(String),

    /// Run file could not be parsed.
    #[error("Configuration file error: {0}")]
    ConfigFile(String),

    /// Environment override could not be parsed.
    #[error("Environment variable {name}: {message}")]
    Env {
        /// Variable name.
        name: &'static str,
        /// What went wrong.
        message: String,
    },

    /// Invalid command line argument.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Rejected by the engine before simulating.
    #[error(transparent)]
    Engine(#[from] ConfigError),

    /// I/O failure while writing output.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV output failure.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// JSON output failure.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl From<pricer_models::models::HestonError> for CliError {
    fn from(err: pricer_models::models::HestonError) -> Self {
        Self::Engine(ConfigError::from(err))
    }
}

/// Result alias for CLI operations.
pub type Result<T> = std::result::Result<T, CliError>;
