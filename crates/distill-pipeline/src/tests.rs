//! Integration tests for the batch scheduler

use crate::cache::{CacheEntry, CacheGateway};
use crate::config::PipelineConfig;
use crate::error::PipelineError;
use crate::scheduler::BatchScheduler;
use crate::source::fingerprint_bytes;
use distill_domain::traits::KvStore;
use distill_domain::{ErrorKind, ExtractionOutcome, ModelSpec, StructuredRecord};
use distill_llm::MockProvider;
use distill_store::{MemoryStore, SqliteStore, StoreError};
use serde_json::json;
use std::fs::File;
use std::io::Write;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

const VALID_RESPONSE: &str = r#"{"title": "ok"}"#;

fn spec() -> ModelSpec {
    ModelSpec::new("Doc").with_required_fields(["title"])
}

fn write_file(dir: &Path, name: &str, contents: &str) {
    let mut file = File::create(dir.join(name)).unwrap();
    file.write_all(contents.as_bytes()).unwrap();
}

fn write_corpus(dir: &Path, count: usize) -> Vec<String> {
    (0..count)
        .map(|i| {
            let contents = format!("document body {:02}", i);
            write_file(dir, &format!("doc{:02}.md", i), &contents);
            contents
        })
        .collect()
}

/// KvStore wrapper that counts accesses and can be told to fail
struct InstrumentedStore {
    inner: MemoryStore,
    gets: Arc<AtomicUsize>,
    puts: Arc<AtomicUsize>,
    fail_gets: bool,
    fail_puts: bool,
}

impl InstrumentedStore {
    fn new() -> Self {
        Self {
            inner: MemoryStore::new(),
            gets: Arc::new(AtomicUsize::new(0)),
            puts: Arc::new(AtomicUsize::new(0)),
            fail_gets: false,
            fail_puts: false,
        }
    }

    fn counters(&self) -> (Arc<AtomicUsize>, Arc<AtomicUsize>) {
        (Arc::clone(&self.gets), Arc::clone(&self.puts))
    }
}

impl KvStore for InstrumentedStore {
    type Error = StoreError;

    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, Self::Error> {
        self.gets.fetch_add(1, Ordering::SeqCst);
        if self.fail_gets {
            return Err(StoreError::InvalidData("store unreachable".to_string()));
        }
        self.inner.get(key)
    }

    fn put(&mut self, key: &str, value: &[u8]) -> Result<(), Self::Error> {
        self.puts.fetch_add(1, Ordering::SeqCst);
        if self.fail_puts {
            return Err(StoreError::InvalidData("store unreachable".to_string()));
        }
        self.inner.put(key, value)
    }
}

#[tokio::test]
async fn test_conservation_invariant_holds_with_failures() {
    let dir = tempfile::tempdir().unwrap();
    let contents = write_corpus(dir.path(), 5);

    let mut provider = MockProvider::new(VALID_RESPONSE);
    provider.add_error(&contents[2]);

    let scheduler = BatchScheduler::new(
        provider,
        MemoryStore::new(),
        spec(),
        PipelineConfig::default(),
    )
    .unwrap();

    let report = scheduler
        .run(dir.path().to_str().unwrap(), false)
        .await
        .unwrap();

    assert_eq!(report.stats.discovered, 5);
    assert_eq!(report.stats.processed, 4);
    assert_eq!(report.stats.errors, 1);
    assert_eq!(report.stats.cache_hits, 0);
    assert!(report.stats.is_balanced());
    assert_eq!(report.outcomes.len(), 5);
}

#[tokio::test]
async fn test_second_run_is_all_cache_hits() {
    let dir = tempfile::tempdir().unwrap();
    write_corpus(dir.path(), 4);
    let db = dir.path().join("cache.db");
    let specifier = dir.path().to_str().unwrap().to_string();

    let first = BatchScheduler::new(
        MockProvider::new(VALID_RESPONSE),
        SqliteStore::new(&db).unwrap(),
        spec(),
        PipelineConfig::default(),
    )
    .unwrap();
    let report = first.run(&specifier, false).await.unwrap();
    assert_eq!(report.stats.processed, 4);
    assert_eq!(first.provider().call_count(), 4);

    let second = BatchScheduler::new(
        MockProvider::new(VALID_RESPONSE),
        SqliteStore::new(&db).unwrap(),
        spec(),
        PipelineConfig::default(),
    )
    .unwrap();
    let report = second.run(&specifier, false).await.unwrap();

    assert_eq!(second.provider().call_count(), 0);
    assert_eq!(report.stats.cache_hits, 4);
    assert_eq!(report.stats.processed, 0);
    assert!(report.outcomes.iter().all(|o| o.is_cache_hit()));
}

#[tokio::test]
async fn test_force_bypasses_cache_lookup() {
    let dir = tempfile::tempdir().unwrap();
    write_corpus(dir.path(), 3);
    let db = dir.path().join("cache.db");
    let specifier = dir.path().to_str().unwrap().to_string();

    let warm = BatchScheduler::new(
        MockProvider::new(VALID_RESPONSE),
        SqliteStore::new(&db).unwrap(),
        spec(),
        PipelineConfig::default(),
    )
    .unwrap();
    warm.run(&specifier, false).await.unwrap();

    let forced = BatchScheduler::new(
        MockProvider::new(VALID_RESPONSE),
        SqliteStore::new(&db).unwrap(),
        spec(),
        PipelineConfig {
            force: true,
            ..Default::default()
        },
    )
    .unwrap();
    let report = forced.run(&specifier, false).await.unwrap();

    assert_eq!(forced.provider().call_count(), 3);
    assert_eq!(report.stats.cache_hits, 0);
    assert_eq!(report.stats.processed, 3);
}

#[tokio::test]
async fn test_empty_discovery_fails_fast_without_calls() {
    let dir = tempfile::tempdir().unwrap();

    let store = InstrumentedStore::new();
    let (gets, puts) = store.counters();
    let provider = MockProvider::new(VALID_RESPONSE);
    let scheduler =
        BatchScheduler::new(provider, store, spec(), PipelineConfig::default()).unwrap();

    let result = scheduler.run(dir.path().to_str().unwrap(), true).await;

    assert!(matches!(result, Err(PipelineError::NoDocumentsFound(_))));
    assert_eq!(scheduler.provider().call_count(), 0);
    assert_eq!(gets.load(Ordering::SeqCst), 0);
    assert_eq!(puts.load(Ordering::SeqCst), 0);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_timeout_failure_writes_nothing() {
    let dir = tempfile::tempdir().unwrap();
    write_corpus(dir.path(), 1);

    let store = InstrumentedStore::new();
    let (_, puts) = store.counters();
    let provider = MockProvider::new(VALID_RESPONSE).with_delay(Duration::from_millis(1500));

    let scheduler = BatchScheduler::new(
        provider,
        store,
        spec(),
        PipelineConfig {
            extraction_timeout_secs: 1,
            ..Default::default()
        },
    )
    .unwrap();

    let report = scheduler
        .run(dir.path().to_str().unwrap(), false)
        .await
        .unwrap();

    assert_eq!(report.stats.errors, 1);
    assert_eq!(report.stats.processed, 0);
    let timeouts: Vec<_> = report
        .outcomes
        .iter()
        .filter(|o| {
            matches!(
                o,
                ExtractionOutcome::Failure {
                    kind: ErrorKind::Timeout,
                    ..
                }
            )
        })
        .collect();
    assert_eq!(timeouts.len(), 1);
    assert_eq!(puts.load(Ordering::SeqCst), 0);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_in_flight_never_exceeds_batch_size() {
    let dir = tempfile::tempdir().unwrap();
    write_corpus(dir.path(), 8);

    let provider = MockProvider::new(VALID_RESPONSE).with_delay(Duration::from_millis(50));
    let scheduler = BatchScheduler::new(
        provider,
        MemoryStore::new(),
        spec(),
        PipelineConfig {
            batch_size: 2,
            ..Default::default()
        },
    )
    .unwrap();

    let report = scheduler
        .run(dir.path().to_str().unwrap(), false)
        .await
        .unwrap();

    assert_eq!(report.stats.processed, 8);
    let provider = scheduler.provider();
    assert!(
        provider.max_in_flight() <= 2,
        "high-water mark {} exceeded batch size",
        provider.max_in_flight()
    );
}

#[tokio::test]
async fn test_error_log_keeps_recent_errors_and_full_count() {
    let dir = tempfile::tempdir().unwrap();
    // Default response carries no "title", so every document fails validation
    write_corpus(dir.path(), 15);

    let scheduler = BatchScheduler::new(
        MockProvider::new(r#"{"untitled": true}"#),
        MemoryStore::new(),
        spec(),
        PipelineConfig::default(),
    )
    .unwrap();

    let report = scheduler
        .run(dir.path().to_str().unwrap(), false)
        .await
        .unwrap();

    assert_eq!(report.stats.errors, 15);
    assert_eq!(report.stats.error_log.len(), 10);
    assert!(report.stats.is_balanced());
    assert!(report
        .stats
        .error_log
        .iter()
        .all(|r| r.kind == ErrorKind::Validation));
}

#[tokio::test]
async fn test_fifteen_document_scenario() {
    let dir = tempfile::tempdir().unwrap();
    let contents = write_corpus(dir.path(), 15);

    // Three documents already resolved in the cache
    let mut store = MemoryStore::new();
    let keyer = CacheGateway::new(MemoryStore::new(), "Doc", false);
    for content in contents.iter().take(3) {
        let fingerprint = fingerprint_bytes(content.as_bytes());
        let entry = CacheEntry {
            model: "Doc".to_string(),
            fingerprint: fingerprint.clone(),
            record: StructuredRecord::new(json!({"title": "cached"})),
            extracted_at: 0,
        };
        store
            .put(&keyer.key(&fingerprint), &serde_json::to_vec(&entry).unwrap())
            .unwrap();
    }

    // Two documents come back without the required field
    let mut provider = MockProvider::new(VALID_RESPONSE);
    provider.add_response(&contents[5], r#"{"wrong_shape": 1}"#);
    provider.add_response(&contents[9], r#"{"also_wrong": 2}"#);

    let scheduler =
        BatchScheduler::new(provider, store, spec(), PipelineConfig::default()).unwrap();
    let report = scheduler
        .run(dir.path().to_str().unwrap(), false)
        .await
        .unwrap();

    assert_eq!(report.stats.discovered, 15);
    assert_eq!(report.stats.processed, 10);
    assert_eq!(report.stats.cache_hits, 3);
    assert_eq!(report.stats.errors, 2);
    assert!(report.stats.is_balanced());

    let mut failing_ids: Vec<&str> = report
        .stats
        .error_log
        .iter()
        .map(|r| r.document_id.as_str())
        .collect();
    failing_ids.sort_unstable();
    assert_eq!(failing_ids, ["doc05", "doc09"]);
    // Cache hits never consume an extraction call
    assert_eq!(scheduler.provider().call_count(), 12);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_cancellation_still_yields_terminal_outcomes() {
    let dir = tempfile::tempdir().unwrap();
    write_corpus(dir.path(), 6);
    let specifier = dir.path().to_str().unwrap().to_string();

    let provider = MockProvider::new(VALID_RESPONSE).with_delay(Duration::from_millis(100));
    let scheduler = BatchScheduler::new(
        provider,
        MemoryStore::new(),
        spec(),
        PipelineConfig {
            batch_size: 1,
            ..Default::default()
        },
    )
    .unwrap();

    let token = scheduler.cancellation_token();
    let run = tokio::spawn(async move { scheduler.run(&specifier, false).await });

    tokio::time::sleep(Duration::from_millis(150)).await;
    token.cancel();

    let report = run.await.unwrap().unwrap();

    assert_eq!(report.outcomes.len(), 6, "no document may be dropped");
    assert!(report.stats.is_balanced());
    assert!(
        report.outcomes.iter().any(|o| matches!(
            o,
            ExtractionOutcome::Failure { message, .. } if message.contains("cancelled")
        )),
        "queued documents should resolve as cancelled failures"
    );
    assert!(report.stats.processed >= 1, "in-flight work should finish");
}

#[tokio::test]
async fn test_cache_write_failure_keeps_success() {
    let dir = tempfile::tempdir().unwrap();
    write_corpus(dir.path(), 2);

    let mut store = InstrumentedStore::new();
    store.fail_puts = true;

    let scheduler = BatchScheduler::new(
        MockProvider::new(VALID_RESPONSE),
        store,
        spec(),
        PipelineConfig::default(),
    )
    .unwrap();

    let report = scheduler
        .run(dir.path().to_str().unwrap(), false)
        .await
        .unwrap();

    // Degraded, not failed: records still reach the caller
    assert_eq!(report.stats.processed, 2);
    assert_eq!(report.stats.errors, 0);
    assert!(report
        .outcomes
        .iter()
        .all(|o| matches!(o, ExtractionOutcome::Success { .. })));
}

#[tokio::test]
async fn test_lookup_failure_degrades_to_recompute() {
    let dir = tempfile::tempdir().unwrap();
    write_corpus(dir.path(), 3);

    let mut store = InstrumentedStore::new();
    store.fail_gets = true;

    let scheduler = BatchScheduler::new(
        MockProvider::new(VALID_RESPONSE),
        store,
        spec(),
        PipelineConfig::default(),
    )
    .unwrap();

    let report = scheduler
        .run(dir.path().to_str().unwrap(), false)
        .await
        .unwrap();

    assert_eq!(report.stats.processed, 3);
    assert_eq!(report.stats.cache_hits, 0);
    assert_eq!(report.stats.errors, 0);
}

#[tokio::test]
async fn test_duplicate_content_extracted_once() {
    let dir = tempfile::tempdir().unwrap();
    write_file(dir.path(), "a.md", "shared body");
    write_file(dir.path(), "b.md", "shared body");
    write_file(dir.path(), "c.md", "distinct body");

    let scheduler = BatchScheduler::new(
        MockProvider::new(VALID_RESPONSE),
        MemoryStore::new(),
        spec(),
        PipelineConfig::default(),
    )
    .unwrap();

    let report = scheduler
        .run(dir.path().to_str().unwrap(), false)
        .await
        .unwrap();

    assert_eq!(scheduler.provider().call_count(), 2);
    assert_eq!(report.stats.discovered, 3);
    assert_eq!(report.stats.processed, 2);
    assert_eq!(report.stats.cache_hits, 1);
    assert!(report.stats.is_balanced());
}

#[tokio::test]
async fn test_report_reassociates_discovery_order() {
    let dir = tempfile::tempdir().unwrap();
    write_corpus(dir.path(), 4);

    let scheduler = BatchScheduler::new(
        MockProvider::new(VALID_RESPONSE),
        MemoryStore::new(),
        spec(),
        PipelineConfig::default(),
    )
    .unwrap();

    let report = scheduler
        .run(dir.path().to_str().unwrap(), false)
        .await
        .unwrap();

    let indices: Vec<usize> = report
        .outcomes_in_discovery_order()
        .iter()
        .map(|o| o.document().index)
        .collect();
    assert_eq!(indices, [0, 1, 2, 3]);
}

#[tokio::test]
async fn test_zero_batch_size_is_config_error() {
    let result = BatchScheduler::new(
        MockProvider::new(VALID_RESPONSE),
        MemoryStore::new(),
        spec(),
        PipelineConfig {
            batch_size: 0,
            ..Default::default()
        },
    );
    assert!(matches!(result, Err(PipelineError::Config(_))));
}
