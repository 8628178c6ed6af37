//! Error types for the CLI application.

use thiserror::Error;

/// Result type alias for CLI operations.
pub type Result<T> = std::result::Result<T, CliError>;

/// CLI-specific errors.
#[derive(Debug, Error)]
pub enum CliError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Class name not present in the registry
    #[error("Unknown class '{0}'. Add it to the [classes] table or run 'distill classes'.")]
    UnknownClass(String),

    /// Store error
    #[error("Store error: {0}")]
    Store(#[from] distill_store::StoreError),

    /// Pipeline error
    #[error(transparent)]
    Pipeline(#[from] distill_pipeline::PipelineError),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// TOML parsing error
    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),
}
