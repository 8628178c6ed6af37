//! Immutable statistics snapshot for a pipeline run

use crate::outcome::ErrorRecord;
use std::time::Duration;

/// Frozen view of a run's counters, error log, and timing
///
/// Produced by the pipeline's stats aggregator. Safe to read while the run
/// continues; a final snapshot is handed to the reporting layer when the run
/// ends.
///
/// For every completed run the counters balance:
/// `discovered == processed + cache_hits + errors`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct StatsSnapshot {
    /// Documents yielded by discovery (duplicates included)
    pub discovered: usize,

    /// Documents that went through a successful extraction call
    pub processed: usize,

    /// Documents resolved from the cache without an extraction call
    pub cache_hits: usize,

    /// Documents that ended in failure
    pub errors: usize,

    /// Most recent retained failures, oldest first
    pub error_log: Vec<ErrorRecord>,

    /// Wall time between run start and this snapshot
    pub elapsed: Duration,
}

impl StatsSnapshot {
    /// Documents that produced a record (processed or cache hit)
    pub fn resolved(&self) -> usize {
        self.processed + self.cache_hits
    }

    /// Average wall seconds per resolved document
    ///
    /// `None` when nothing resolved - the reporting layer renders that as
    /// "n/a" rather than dividing by zero.
    pub fn avg_secs_per_document(&self) -> Option<f64> {
        let resolved = self.resolved();
        if resolved == 0 {
            None
        } else {
            Some(self.elapsed.as_secs_f64() / resolved as f64)
        }
    }

    /// Whether the conservation invariant holds
    pub fn is_balanced(&self) -> bool {
        self.discovered == self.processed + self.cache_hits + self.errors
    }
}
