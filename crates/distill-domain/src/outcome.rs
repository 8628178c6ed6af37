//! Extraction outcomes and per-document error records

use crate::document::DocumentRef;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// A validated structured record returned by the extraction function
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StructuredRecord(Value);

impl StructuredRecord {
    /// Wrap a JSON value that already passed schema validation
    pub fn new(value: Value) -> Self {
        Self(value)
    }

    /// Borrow the underlying JSON value
    pub fn as_value(&self) -> &Value {
        &self.0
    }

    /// Consume the record, returning the JSON value
    pub fn into_value(self) -> Value {
        self.0
    }
}

/// Classification of a per-document failure
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorKind {
    /// Document could not be read
    Io,
    /// Extraction returned a malformed or incomplete record
    Validation,
    /// Extraction call exceeded the configured deadline
    Timeout,
    /// Any other failure from the extraction call
    Extraction,
    /// Result could not be persisted to the cache
    CacheWrite,
}

impl ErrorKind {
    /// Stable string form used in reports and logs
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::Io => "io",
            ErrorKind::Validation => "validation",
            ErrorKind::Timeout => "timeout",
            ErrorKind::Extraction => "extraction",
            ErrorKind::CacheWrite => "cache-write",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Terminal result of processing one document
///
/// Exactly one outcome exists per discovered document; it is consumed exactly
/// once by the stats aggregator and carries its originating [`DocumentRef`] so
/// consumers can re-associate completion-order results with discovery order.
#[derive(Debug, Clone, PartialEq)]
pub enum ExtractionOutcome {
    /// Extraction ran and the record passed validation
    Success {
        /// Originating document
        doc: DocumentRef,
        /// The validated record
        record: StructuredRecord,
    },
    /// The record was already present in the cache
    CacheHit {
        /// Originating document
        doc: DocumentRef,
        /// The previously extracted record
        record: StructuredRecord,
    },
    /// Extraction failed; the document produced no record
    Failure {
        /// Originating document
        doc: DocumentRef,
        /// Failure classification
        kind: ErrorKind,
        /// Underlying message, preserved verbatim
        message: String,
    },
}

impl ExtractionOutcome {
    /// The document this outcome belongs to
    pub fn document(&self) -> &DocumentRef {
        match self {
            ExtractionOutcome::Success { doc, .. } => doc,
            ExtractionOutcome::CacheHit { doc, .. } => doc,
            ExtractionOutcome::Failure { doc, .. } => doc,
        }
    }

    /// True for the `Failure` variant
    pub fn is_failure(&self) -> bool {
        matches!(self, ExtractionOutcome::Failure { .. })
    }

    /// True for the `CacheHit` variant
    pub fn is_cache_hit(&self) -> bool {
        matches!(self, ExtractionOutcome::CacheHit { .. })
    }

    /// The extracted record, if this outcome carries one
    pub fn record(&self) -> Option<&StructuredRecord> {
        match self {
            ExtractionOutcome::Success { record, .. } => Some(record),
            ExtractionOutcome::CacheHit { record, .. } => Some(record),
            ExtractionOutcome::Failure { .. } => None,
        }
    }
}

/// One retained failure, kept in the bounded error log
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorRecord {
    /// Identifier of the failing document
    pub document_id: String,

    /// Failure classification
    pub kind: ErrorKind,

    /// Underlying message
    pub message: String,

    /// Seconds since the Unix epoch when the failure was recorded
    pub timestamp: u64,
}
