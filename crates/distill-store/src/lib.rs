//! Distill Storage Layer
//!
//! Implements the [`KvStore`] contract used by the pipeline's cache gateway.
//!
//! # Architecture
//!
//! - [`SqliteStore`]: persistent storage in a single SQLite file, one row per
//!   cache key, `INSERT OR REPLACE` so concurrent writes to the same key are
//!   last-write-wins
//! - [`MemoryStore`]: HashMap-backed store for tests and ephemeral runs
//!
//! # Examples
//!
//! ```no_run
//! use distill_store::SqliteStore;
//! use distill_domain::traits::KvStore;
//!
//! let mut store = SqliteStore::new("distill.db").unwrap();
//! store.put("key", b"value").unwrap();
//! assert_eq!(store.get("key").unwrap(), Some(b"value".to_vec()));
//! ```

#![warn(missing_docs)]

use distill_domain::traits::KvStore;
use rusqlite::{params, Connection, OptionalExtension};
use std::collections::HashMap;
use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};
use thiserror::Error;

/// Errors that can occur during storage operations
#[derive(Error, Debug)]
pub enum StoreError {
    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// Invalid data format
    #[error("Invalid data: {0}")]
    InvalidData(String),
}

/// SQLite-based key-value store
///
/// One table, one row per key. Values are opaque bytes; the pipeline owns the
/// serialization format.
///
/// # Thread Safety
///
/// SQLite connections are not thread-safe. The pipeline shares a store between
/// workers behind a mutex; independent threads should open their own store.
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// Open (or create) a store at the given database path
    ///
    /// Use `:memory:` for an in-memory database (useful for testing).
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use distill_store::SqliteStore;
    ///
    /// let store = SqliteStore::new("distill.db").unwrap();
    /// ```
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self, StoreError> {
        let conn = Connection::open(path)?;
        let mut store = Self { conn };
        store.initialize_schema()?;
        Ok(store)
    }

    /// Initialize the database schema
    fn initialize_schema(&mut self) -> Result<(), StoreError> {
        self.conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS cache_entries (
                key        TEXT PRIMARY KEY,
                value      BLOB NOT NULL,
                updated_at INTEGER NOT NULL
            );",
        )?;
        Ok(())
    }

    /// Number of entries currently stored
    pub fn len(&self) -> Result<usize, StoreError> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM cache_entries", [], |row| row.get(0))?;
        Ok(count as usize)
    }

    /// True if no entries are stored
    pub fn is_empty(&self) -> Result<bool, StoreError> {
        Ok(self.len()? == 0)
    }

    fn now_secs() -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or(0)
    }
}

impl KvStore for SqliteStore {
    type Error = StoreError;

    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, Self::Error> {
        let value = self
            .conn
            .query_row(
                "SELECT value FROM cache_entries WHERE key = ?1",
                params![key],
                |row| row.get::<_, Vec<u8>>(0),
            )
            .optional()?;
        Ok(value)
    }

    fn put(&mut self, key: &str, value: &[u8]) -> Result<(), Self::Error> {
        self.conn.execute(
            "INSERT OR REPLACE INTO cache_entries (key, value, updated_at) VALUES (?1, ?2, ?3)",
            params![key, value, Self::now_secs()],
        )?;
        Ok(())
    }
}

/// In-memory key-value store
///
/// Backed by a plain HashMap. Useful for tests and for runs where persistence
/// across invocations is not wanted.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: HashMap<String, Vec<u8>>,
}

impl MemoryStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of entries currently stored
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True if no entries are stored
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl KvStore for MemoryStore {
    type Error = StoreError;

    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, Self::Error> {
        Ok(self.entries.get(key).cloned())
    }

    fn put(&mut self, key: &str, value: &[u8]) -> Result<(), Self::Error> {
        self.entries.insert(key.to_string(), value.to_vec());
        Ok(())
    }
}
