//! Statistics accumulation for a pipeline run

use distill_domain::{ErrorRecord, ExtractionOutcome, StatsSnapshot};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::{Instant, SystemTime, UNIX_EPOCH};
use tracing::warn;

/// Accumulates counters and the bounded error log for one run
///
/// Cloning is cheap and every clone records into the same accumulator, so the
/// scheduler can hand one to each completion without coordination beyond the
/// internal mutex. `record` increments exactly one counter per outcome.
///
/// The error log is a fixed-capacity deque: once full, the oldest record is
/// evicted on each append. Evicted errors stay in the total count.
pub struct StatsAggregator {
    inner: Arc<Mutex<Inner>>,
}

struct Inner {
    discovered: usize,
    processed: usize,
    cache_hits: usize,
    errors: usize,
    error_log: VecDeque<ErrorRecord>,
    capacity: usize,
    started: Instant,
}

impl StatsAggregator {
    /// Create an aggregator retaining at most `error_log_capacity` records
    pub fn new(error_log_capacity: usize) -> Self {
        Self {
            inner: Arc::new(Mutex::new(Inner {
                discovered: 0,
                processed: 0,
                cache_hits: 0,
                errors: 0,
                error_log: VecDeque::with_capacity(error_log_capacity),
                capacity: error_log_capacity,
                started: Instant::now(),
            })),
        }
    }

    /// Set the discovered-document count for this run
    pub fn set_discovered(&self, count: usize) {
        if let Ok(mut inner) = self.inner.lock() {
            inner.discovered = count;
        }
    }

    /// Record one terminal outcome
    pub fn record(&self, outcome: &ExtractionOutcome) {
        let mut inner = match self.inner.lock() {
            Ok(inner) => inner,
            Err(e) => {
                warn!("Stats lock poisoned, dropping record: {}", e);
                return;
            }
        };

        match outcome {
            ExtractionOutcome::Success { .. } => inner.processed += 1,
            ExtractionOutcome::CacheHit { .. } => inner.cache_hits += 1,
            ExtractionOutcome::Failure { doc, kind, message } => {
                inner.errors += 1;

                if inner.error_log.len() == inner.capacity {
                    inner.error_log.pop_front();
                }
                inner.error_log.push_back(ErrorRecord {
                    document_id: doc.id.clone(),
                    kind: *kind,
                    message: message.clone(),
                    timestamp: SystemTime::now()
                        .duration_since(UNIX_EPOCH)
                        .map(|d| d.as_secs())
                        .unwrap_or(0),
                });
            }
        }
    }

    /// Freeze the current counters into an immutable snapshot
    ///
    /// Safe to call while workers are still recording.
    pub fn snapshot(&self) -> StatsSnapshot {
        let inner = match self.inner.lock() {
            Ok(inner) => inner,
            Err(e) => {
                warn!("Stats lock poisoned, returning empty snapshot: {}", e);
                return StatsSnapshot::default();
            }
        };

        StatsSnapshot {
            discovered: inner.discovered,
            processed: inner.processed,
            cache_hits: inner.cache_hits,
            errors: inner.errors,
            error_log: inner.error_log.iter().cloned().collect(),
            elapsed: inner.started.elapsed(),
        }
    }
}

impl Clone for StatsAggregator {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}
