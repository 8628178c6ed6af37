//! Cache gateway - keyed lookups and write-backs over any KvStore

use distill_domain::traits::KvStore;
use distill_domain::{Fingerprint, StructuredRecord};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::sync::{Arc, Mutex};
use std::time::{SystemTime, UNIX_EPOCH};
use thiserror::Error;
use tracing::{debug, warn};

/// A cache write failed after a successful extraction
///
/// The pipeline treats this as a degraded condition: the extracted record is
/// still returned to the caller even though it was not persisted.
#[derive(Error, Debug)]
#[error("Cache write failed: {0}")]
pub struct CacheWriteError(pub String);

/// Stored value for one (model, fingerprint) key
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheEntry {
    /// Model class the record was extracted for
    pub model: String,

    /// Content fingerprint of the source document
    pub fingerprint: Fingerprint,

    /// The previously extracted record
    pub record: StructuredRecord,

    /// Seconds since the Unix epoch when extraction happened
    pub extracted_at: u64,
}

/// Wraps a [`KvStore`] with keying, serialization, and degrade-on-failure
///
/// Keys are the SHA-256 of `model NUL fingerprint`, so a model change never
/// aliases another model's entries. Lookup failures of any sort (store
/// unreachable, malformed stored bytes) degrade to a cache miss - the pipeline
/// recomputes rather than aborts.
pub struct CacheGateway<S>
where
    S: KvStore,
{
    store: Arc<Mutex<S>>,
    model: String,
    force: bool,
}

impl<S> Clone for CacheGateway<S>
where
    S: KvStore,
{
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            model: self.model.clone(),
            force: self.force,
        }
    }
}

impl<S> CacheGateway<S>
where
    S: KvStore,
    S::Error: std::fmt::Display,
{
    /// Create a gateway for one model class
    ///
    /// `force` makes every lookup a miss while leaving write-through intact,
    /// so a forced run overwrites stale entries.
    pub fn new(store: S, model: impl Into<String>, force: bool) -> Self {
        Self {
            store: Arc::new(Mutex::new(store)),
            model: model.into(),
            force,
        }
    }

    /// The cache key for a fingerprint
    pub fn key(&self, fingerprint: &Fingerprint) -> String {
        let mut hasher = Sha256::new();
        hasher.update(self.model.as_bytes());
        hasher.update([0u8]);
        hasher.update(fingerprint.as_str().as_bytes());
        format!("{:x}", hasher.finalize())
    }

    /// Look up a previously extracted record
    ///
    /// Returns `None` under `force`, on a store error, or when the stored
    /// bytes do not decode as a [`CacheEntry`].
    pub fn lookup(&self, fingerprint: &Fingerprint) -> Option<CacheEntry> {
        if self.force {
            return None;
        }

        let key = self.key(fingerprint);
        let bytes = {
            let store = match self.store.lock() {
                Ok(store) => store,
                Err(e) => {
                    warn!("Cache lock poisoned, treating as miss: {}", e);
                    return None;
                }
            };
            match store.get(&key) {
                Ok(bytes) => bytes?,
                Err(e) => {
                    warn!("Cache lookup failed, treating as miss: {}", e);
                    return None;
                }
            }
        };

        match serde_json::from_slice::<CacheEntry>(&bytes) {
            Ok(entry) => {
                debug!("Cache hit for fingerprint {}", fingerprint);
                Some(entry)
            }
            Err(e) => {
                warn!("Malformed cache entry, treating as miss: {}", e);
                None
            }
        }
    }

    /// Persist a successfully extracted record
    pub fn store(
        &self,
        fingerprint: &Fingerprint,
        record: &StructuredRecord,
    ) -> Result<(), CacheWriteError> {
        let entry = CacheEntry {
            model: self.model.clone(),
            fingerprint: fingerprint.clone(),
            record: record.clone(),
            extracted_at: SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .map(|d| d.as_secs())
                .unwrap_or(0),
        };

        let bytes =
            serde_json::to_vec(&entry).map_err(|e| CacheWriteError(e.to_string()))?;

        let key = self.key(fingerprint);
        let mut store = self
            .store
            .lock()
            .map_err(|e| CacheWriteError(format!("lock poisoned: {}", e)))?;
        store
            .put(&key, &bytes)
            .map_err(|e| CacheWriteError(e.to_string()))
    }
}
