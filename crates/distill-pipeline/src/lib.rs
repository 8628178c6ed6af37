//! Distill Batch-Extraction Pipeline
//!
//! The run driver: discovers input documents, partitions them into cache hits
//! and misses, dispatches misses to a bounded pool of extraction workers,
//! writes successful results back to the cache, and accumulates statistics
//! with per-document error attribution.
//!
//! # Data Flow
//!
//! ```text
//! DocumentSource → CacheGateway (partition) → BatchScheduler
//!     → ExtractionWorker (×batch_size concurrent)
//!     → CacheGateway (write-back) + StatsAggregator (record)
//!     → RunReport (outcomes + StatsSnapshot)
//! ```
//!
//! # Guarantees
//!
//! - Per-document errors never abort the batch; only an empty discovery is
//!   fatal (`NoDocumentsFound`)
//! - At most `batch_size` extraction calls are in flight at any moment
//! - Every discovered document produces exactly one terminal outcome, even
//!   under cancellation
//! - `discovered == processed + cache_hits + errors` for every completed run
//!
//! # Example
//!
//! ```no_run
//! use distill_pipeline::{BatchScheduler, PipelineConfig};
//! use distill_llm::MockProvider;
//! use distill_store::MemoryStore;
//! use distill_domain::ModelSpec;
//!
//! # async fn example() -> Result<(), distill_pipeline::PipelineError> {
//! let provider = MockProvider::new(r#"{"title": "T"}"#);
//! let spec = ModelSpec::new("Doc").with_required_fields(["title"]);
//! let scheduler = BatchScheduler::new(
//!     provider,
//!     MemoryStore::new(),
//!     spec,
//!     PipelineConfig::default(),
//! )?;
//!
//! let report = scheduler.run("./reviews", true).await?;
//! println!("{} documents, {} errors", report.stats.discovered, report.stats.errors);
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

mod cache;
mod config;
mod error;
mod observer;
mod scheduler;
mod source;
mod stats;

#[cfg(test)]
mod tests;

pub use cache::{CacheEntry, CacheGateway, CacheWriteError};
pub use config::PipelineConfig;
pub use error::PipelineError;
pub use observer::{LogObserver, NullObserver};
pub use scheduler::{BatchScheduler, RunReport};
pub use source::{Discovery, DocumentSource};
pub use stats::StatsAggregator;
