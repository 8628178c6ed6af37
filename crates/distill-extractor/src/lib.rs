//! Distill Extraction Worker
//!
//! Processes one document at a time: read content, invoke the extraction
//! provider under a deadline, parse the reply, validate it against the model
//! spec, and convert every failure into a typed outcome.
//!
//! # Architecture
//!
//! ```text
//! DocumentRef → read → ExtractionProvider (spawn_blocking + timeout)
//!             → parse → ModelSpec::validate → ExtractionOutcome
//! ```
//!
//! The worker never touches the cache: write-back on success and stats
//! recording are the batch scheduler's job, so one completion produces exactly
//! one cache write and one stats record there.
//!
//! # Example
//!
//! ```no_run
//! use distill_extractor::ExtractionWorker;
//! use distill_llm::MockProvider;
//! use distill_domain::{DocumentRef, Fingerprint, ModelSpec};
//! use std::time::Duration;
//!
//! # async fn example() {
//! let provider = MockProvider::new(r#"{"title": "T"}"#);
//! let spec = ModelSpec::new("Doc").with_required_fields(["title"]);
//! let worker = ExtractionWorker::new(provider, spec);
//!
//! let doc = DocumentRef::new("a", "a.md", Fingerprint::new("00"), 0);
//! let outcome = worker.extract(&doc, Duration::from_secs(120)).await;
//! # }
//! ```

#![warn(missing_docs)]

mod error;
mod parser;
mod worker;

pub use error::ExtractorError;
pub use worker::ExtractionWorker;
