//! Document identity - paths, fingerprints, and discovery order

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// Stable content fingerprint used as the cache-partitioning key
///
/// Holds the lowercase hex digest of the document contents. The hash itself is
/// computed by the discovery layer; this type only carries the result so that
/// two documents with identical contents compare equal everywhere.
///
/// # Examples
///
/// ```
/// use distill_domain::Fingerprint;
///
/// let a = Fingerprint::new("9f86d081884c7d65");
/// let b = Fingerprint::new("9f86d081884c7d65");
/// assert_eq!(a, b);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Fingerprint(String);

impl Fingerprint {
    /// Wrap a precomputed hex digest
    pub fn new(digest: impl Into<String>) -> Self {
        Self(digest.into())
    }

    /// Get the hex digest as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One discovered input document
///
/// Created by the document source during discovery and treated as immutable by
/// every downstream component. The `index` records discovery order so that
/// outcomes arriving out of completion order can be re-associated with their
/// position in the original sequence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentRef {
    /// Short identifier (the file stem)
    pub id: String,

    /// Filesystem path the document was read from
    pub path: PathBuf,

    /// Content fingerprint
    pub fingerprint: Fingerprint,

    /// Zero-based discovery-order position
    pub index: usize,
}

impl DocumentRef {
    /// Create a new document reference
    pub fn new(
        id: impl Into<String>,
        path: impl Into<PathBuf>,
        fingerprint: Fingerprint,
        index: usize,
    ) -> Self {
        Self {
            id: id.into(),
            path: path.into(),
            fingerprint,
            index,
        }
    }
}

impl fmt::Display for DocumentRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fingerprint_equality() {
        let a = Fingerprint::new("abc123");
        let b = Fingerprint::new("abc123");
        let c = Fingerprint::new("def456");
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_document_ref_display() {
        let doc = DocumentRef::new("report_q3", "/data/report_q3.md", Fingerprint::new("ff"), 0);
        assert_eq!(doc.to_string(), "report_q3");
    }

    #[test]
    fn test_document_ref_preserves_index() {
        let doc = DocumentRef::new("a", "a.md", Fingerprint::new("00"), 7);
        assert_eq!(doc.index, 7);
    }
}
