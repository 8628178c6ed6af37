//! Batch scheduler - drives a full extraction run

use crate::cache::CacheGateway;
use crate::config::PipelineConfig;
use crate::error::PipelineError;
use crate::observer::NullObserver;
use crate::source::DocumentSource;
use crate::stats::StatsAggregator;
use distill_domain::traits::{ExtractionProvider, KvStore, PipelineObserver};
use distill_domain::{
    DocumentRef, ErrorKind, ExtractionOutcome, Fingerprint, ModelSpec, StatsSnapshot,
};
use distill_extractor::ExtractionWorker;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

/// Final result of a pipeline run
#[derive(Debug, Clone)]
pub struct RunReport {
    /// Every terminal outcome, in arrival order
    pub outcomes: Vec<ExtractionOutcome>,

    /// Frozen statistics for the run
    pub stats: StatsSnapshot,
}

impl RunReport {
    /// Outcomes re-associated with discovery order
    pub fn outcomes_in_discovery_order(&self) -> Vec<&ExtractionOutcome> {
        let mut ordered: Vec<&ExtractionOutcome> = self.outcomes.iter().collect();
        ordered.sort_by_key(|outcome| outcome.document().index);
        ordered
    }
}

/// Coordinates discovery, cache partitioning, bounded dispatch, and stats
///
/// Processing is fail-isolated, not fail-fast: a per-document failure becomes
/// that document's outcome and the batch continues. The only fatal condition
/// is a discovery that yields nothing.
pub struct BatchScheduler<P, S>
where
    P: ExtractionProvider,
    S: KvStore,
{
    worker: Arc<ExtractionWorker<P>>,
    cache: CacheGateway<S>,
    config: PipelineConfig,
    observer: Arc<dyn PipelineObserver + Send + Sync>,
    cancel: CancellationToken,
}

impl<P, S> BatchScheduler<P, S>
where
    P: ExtractionProvider + Send + Sync + 'static,
    P::Error: std::fmt::Display,
    S: KvStore + Send + 'static,
    S::Error: std::fmt::Display,
{
    /// Create a scheduler for one model spec
    ///
    /// Fails if the configuration is unusable (for instance a zero
    /// `batch_size`).
    pub fn new(
        provider: P,
        store: S,
        spec: ModelSpec,
        config: PipelineConfig,
    ) -> Result<Self, PipelineError> {
        config.validate().map_err(PipelineError::Config)?;

        let cache = CacheGateway::new(store, spec.name.clone(), config.force);
        let worker = Arc::new(ExtractionWorker::new(provider, spec));

        Ok(Self {
            worker,
            cache,
            config,
            observer: Arc::new(NullObserver),
            cancel: CancellationToken::new(),
        })
    }

    /// Attach an observer for run progress
    pub fn with_observer(mut self, observer: Arc<dyn PipelineObserver + Send + Sync>) -> Self {
        self.observer = observer;
        self
    }

    /// Token that stops dispatch of new work when cancelled
    ///
    /// In-flight extractions finish or time out; documents that never got a
    /// worker slot still produce terminal failure outcomes.
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Shared handle to the extraction provider
    pub fn provider(&self) -> Arc<P> {
        self.worker.provider()
    }

    /// Drive a full run over the given source specifier
    pub async fn run(&self, specifier: &str, recursive: bool) -> Result<RunReport, PipelineError> {
        let source = DocumentSource::new(self.config.extensions.clone());
        let discovery = source.discover(specifier, recursive)?;

        let stats = StatsAggregator::new(self.config.error_log_capacity);
        stats.set_discovered(discovery.total());

        info!(
            "Discovered {} documents ({} unique) for '{}'",
            discovery.total(),
            discovery.documents.len(),
            specifier
        );
        self.observer.on_discovered(&discovery.all_ordered());

        // Cache partition, in discovery order. Hits resolve immediately and
        // never consume a worker slot.
        let mut outcomes: Vec<ExtractionOutcome> = Vec::with_capacity(discovery.total());
        let mut misses: Vec<DocumentRef> = Vec::new();

        for doc in &discovery.documents {
            match self.cache.lookup(&doc.fingerprint) {
                Some(entry) => {
                    let outcome = ExtractionOutcome::CacheHit {
                        doc: doc.clone(),
                        record: entry.record,
                    };
                    stats.record(&outcome);
                    self.observer.on_outcome(&outcome);
                    outcomes.push(outcome);
                }
                None => misses.push(doc.clone()),
            }
        }

        info!(
            "{} cache hits, dispatching {} documents (batch size {})",
            outcomes.len(),
            misses.len(),
            self.config.batch_size
        );

        // Bounded dispatch. Permits enforce the in-flight ceiling; the
        // cancellation check sits after the permit so cancelled runs drain
        // the queue with failure outcomes instead of dropping documents.
        let semaphore = Arc::new(Semaphore::new(self.config.batch_size));
        let mut tasks: JoinSet<ExtractionOutcome> = JoinSet::new();

        for doc in misses {
            let semaphore = Arc::clone(&semaphore);
            let worker = Arc::clone(&self.worker);
            let cache = self.cache.clone();
            let cancel = self.cancel.clone();
            let deadline = self.config.extraction_timeout();

            tasks.spawn(async move {
                let _permit = semaphore
                    .acquire_owned()
                    .await
                    .expect("semaphore never closed");

                if cancel.is_cancelled() {
                    return ExtractionOutcome::Failure {
                        doc,
                        kind: ErrorKind::Extraction,
                        message: "run cancelled before dispatch".to_string(),
                    };
                }

                let outcome = worker.extract(&doc, deadline).await;

                if let ExtractionOutcome::Success { doc, record } = &outcome {
                    if let Err(e) = cache.store(&doc.fingerprint, record) {
                        // Degraded, not failed: the record still reaches the caller
                        warn!("Cache write for '{}' failed: {}", doc.id, e);
                    }
                }

                outcome
            });
        }

        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok(outcome) => {
                    stats.record(&outcome);
                    self.observer.on_outcome(&outcome);
                    outcomes.push(outcome);
                }
                Err(e) => error!("Extraction task aborted: {}", e),
            }
        }

        // Duplicates resolve through the shared cache key: mirror the first
        // occurrence's terminal outcome without more work.
        let by_fingerprint: HashMap<Fingerprint, usize> = outcomes
            .iter()
            .enumerate()
            .map(|(i, outcome)| (outcome.document().fingerprint.clone(), i))
            .collect();

        for dup in &discovery.duplicates {
            let outcome = match by_fingerprint.get(&dup.fingerprint).map(|&i| &outcomes[i]) {
                Some(ExtractionOutcome::Success { record, .. })
                | Some(ExtractionOutcome::CacheHit { record, .. }) => ExtractionOutcome::CacheHit {
                    doc: dup.clone(),
                    record: record.clone(),
                },
                Some(ExtractionOutcome::Failure { kind, message, .. }) => {
                    ExtractionOutcome::Failure {
                        doc: dup.clone(),
                        kind: *kind,
                        message: message.clone(),
                    }
                }
                None => ExtractionOutcome::Failure {
                    doc: dup.clone(),
                    kind: ErrorKind::Extraction,
                    message: "originating document produced no outcome".to_string(),
                },
            };
            stats.record(&outcome);
            self.observer.on_outcome(&outcome);
            outcomes.push(outcome);
        }

        let snapshot = stats.snapshot();
        self.observer.on_complete(&snapshot);

        info!(
            "Run complete: {} discovered = {} processed + {} cache hits + {} errors",
            snapshot.discovered, snapshot.processed, snapshot.cache_hits, snapshot.errors
        );

        Ok(RunReport {
            outcomes,
            stats: snapshot,
        })
    }
}
