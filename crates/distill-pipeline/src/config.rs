//! Run configuration for the pipeline

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Configuration for one pipeline run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Maximum extraction calls in flight simultaneously
    pub batch_size: usize,

    /// Deadline for a single extraction call (seconds)
    pub extraction_timeout_secs: u64,

    /// Bypass cache lookups and overwrite entries on success
    pub force: bool,

    /// How many recent error records the stats aggregator retains
    pub error_log_capacity: usize,

    /// File extensions accepted during discovery (lowercase, no dot)
    pub extensions: Vec<String>,
}

impl PipelineConfig {
    /// Get the extraction deadline as a Duration
    pub fn extraction_timeout(&self) -> Duration {
        Duration::from_secs(self.extraction_timeout_secs)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.batch_size == 0 {
            return Err("batch_size must be greater than 0".to_string());
        }
        if self.extraction_timeout_secs == 0 {
            return Err("extraction_timeout_secs must be greater than 0".to_string());
        }
        if self.error_log_capacity == 0 {
            return Err("error_log_capacity must be greater than 0".to_string());
        }
        if self.extensions.is_empty() {
            return Err("extensions must not be empty".to_string());
        }
        Ok(())
    }
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            batch_size: 5,
            extraction_timeout_secs: 120,
            force: false,
            error_log_capacity: 10,
            extensions: vec!["md".to_string(), "markdown".to_string()],
        }
    }
}
