//! Built-in observer implementations

use distill_domain::traits::PipelineObserver;
use distill_domain::{DocumentRef, ExtractionOutcome, StatsSnapshot};
use tracing::{info, warn};

/// Observer that renders nothing
#[derive(Debug, Clone, Copy, Default)]
pub struct NullObserver;

impl PipelineObserver for NullObserver {}

/// Observer that narrates the run through `tracing`
///
/// Useful for headless runs where no terminal renderer is attached.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogObserver;

impl PipelineObserver for LogObserver {
    fn on_discovered(&self, documents: &[DocumentRef]) {
        info!("Discovered {} documents", documents.len());
    }

    fn on_outcome(&self, outcome: &ExtractionOutcome) {
        match outcome {
            ExtractionOutcome::Success { doc, .. } => info!("Processed '{}'", doc.id),
            ExtractionOutcome::CacheHit { doc, .. } => info!("Cache hit for '{}'", doc.id),
            ExtractionOutcome::Failure { doc, kind, message } => {
                warn!("Failed '{}' ({}): {}", doc.id, kind, message)
            }
        }
    }

    fn on_complete(&self, stats: &StatsSnapshot) {
        info!(
            "Run complete: {} discovered, {} processed, {} cache hits, {} errors in {:.2}s",
            stats.discovered,
            stats.processed,
            stats.cache_hits,
            stats.errors,
            stats.elapsed.as_secs_f64()
        );
    }
}
