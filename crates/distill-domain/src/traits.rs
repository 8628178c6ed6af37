//! Trait definitions for external interactions
//!
//! These traits define the boundaries between domain logic and infrastructure.
//! Infrastructure implementations live in other crates.

use crate::document::DocumentRef;
use crate::model::ModelSpec;
use crate::outcome::ExtractionOutcome;
use crate::stats::StatsSnapshot;

/// Byte-oriented key-value storage
///
/// Implemented by the infrastructure layer (distill-store). The pipeline
/// serializes cache entries to JSON bytes on the way in and tolerates malformed
/// bytes on the way out.
pub trait KvStore {
    /// Error type for store operations
    type Error;

    /// Fetch the value stored under `key`, if any
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, Self::Error>;

    /// Store `value` under `key`, replacing any previous value
    fn put(&mut self, key: &str, value: &[u8]) -> Result<(), Self::Error>;
}

/// The external model-backed extraction function
///
/// Implemented by the infrastructure layer (distill-llm). The call may be slow
/// and may fail; deadline enforcement belongs to the worker that invokes it,
/// not to implementations.
pub trait ExtractionProvider {
    /// Error type for extraction operations
    type Error;

    /// Extract a structured record from document content
    ///
    /// Returns the raw response text; parsing and schema validation happen in
    /// the extraction worker.
    fn extract(&self, content: &str, spec: &ModelSpec) -> Result<String, Self::Error>;
}

/// Observer hooks for run progress
///
/// The pipeline calls these synchronously on each transition, decoupling the
/// core from any particular rendering technology. All methods default to
/// no-ops so implementations override only what they render.
pub trait PipelineObserver {
    /// Called once after discovery, before any cache or extraction work
    fn on_discovered(&self, documents: &[DocumentRef]) {
        let _ = documents;
    }

    /// Called once per terminal outcome, in arrival order
    fn on_outcome(&self, outcome: &ExtractionOutcome) {
        let _ = outcome;
    }

    /// Called once when every discovered document has a terminal outcome
    fn on_complete(&self, stats: &StatsSnapshot) {
        let _ = stats;
    }
}
