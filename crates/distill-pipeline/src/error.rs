//! Run-level error types for the pipeline

use thiserror::Error;

/// Errors that abort a pipeline run
///
/// Per-document failures are not here - they are isolated into
/// [`ExtractionOutcome::Failure`](distill_domain::ExtractionOutcome) and never
/// abort the batch.
#[derive(Error, Debug)]
pub enum PipelineError {
    /// The source specifier resolved to no documents at all
    #[error("No documents found for '{0}'")]
    NoDocumentsFound(String),

    /// The source specifier is a malformed glob pattern
    #[error("Invalid glob pattern '{pattern}': {message}")]
    InvalidPattern {
        /// The offending pattern
        pattern: String,
        /// Parser message
        message: String,
    },

    /// The run configuration is unusable
    #[error("Configuration error: {0}")]
    Config(String),
}
