//! Document discovery - files, globs, and directory walks

use crate::error::PipelineError;
use distill_domain::{DocumentRef, Fingerprint};
use sha2::{Digest, Sha256};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use walkdir::WalkDir;

/// Result of document discovery
///
/// `documents` holds one reference per distinct fingerprint, in discovery
/// order. `duplicates` holds the later references whose content matched an
/// earlier document; they count toward `discovered` but are never dispatched -
/// the scheduler mirrors the first occurrence's outcome onto them.
#[derive(Debug, Clone)]
pub struct Discovery {
    /// Unique-content documents, discovery order
    pub documents: Vec<DocumentRef>,

    /// Same-content references collapsed out of the work list
    pub duplicates: Vec<DocumentRef>,
}

impl Discovery {
    /// Total discovered references, duplicates included
    pub fn total(&self) -> usize {
        self.documents.len() + self.duplicates.len()
    }

    /// All references ordered by discovery index
    pub fn all_ordered(&self) -> Vec<DocumentRef> {
        let mut all: Vec<DocumentRef> = self
            .documents
            .iter()
            .chain(self.duplicates.iter())
            .cloned()
            .collect();
        all.sort_by_key(|doc| doc.index);
        all
    }
}

/// Discovers input documents from a source specifier
///
/// A specifier is a single file path, a glob pattern, or a directory root.
/// Output order is deterministic: candidate paths are sorted before
/// fingerprinting regardless of how the filesystem yielded them.
pub struct DocumentSource {
    extensions: Vec<String>,
}

impl DocumentSource {
    /// Create a source accepting the given extensions (lowercase, no dot)
    pub fn new(extensions: Vec<String>) -> Self {
        Self { extensions }
    }

    /// Discover documents for a specifier
    ///
    /// Unreadable files are skipped with a warning. A specifier that resolves
    /// to nothing at all is a [`PipelineError::NoDocumentsFound`].
    pub fn discover(&self, specifier: &str, recursive: bool) -> Result<Discovery, PipelineError> {
        let mut paths = self.candidate_paths(specifier, recursive)?;
        paths.sort();
        paths.dedup();

        let mut documents: Vec<DocumentRef> = Vec::new();
        let mut duplicates: Vec<DocumentRef> = Vec::new();
        let mut seen: HashSet<Fingerprint> = HashSet::new();
        let mut index = 0;

        for path in paths {
            let contents = match fs::read(&path) {
                Ok(contents) => contents,
                Err(e) => {
                    warn!("Skipping unreadable '{}': {}", path.display(), e);
                    continue;
                }
            };

            let fingerprint = fingerprint_bytes(&contents);
            let id = path
                .file_stem()
                .map(|stem| stem.to_string_lossy().into_owned())
                .unwrap_or_else(|| path.display().to_string());

            let doc = DocumentRef::new(id, path, fingerprint.clone(), index);
            index += 1;

            if seen.contains(&fingerprint) {
                debug!("Duplicate content: '{}' matches an earlier document", doc.id);
                duplicates.push(doc);
            } else {
                seen.insert(fingerprint);
                documents.push(doc);
            }
        }

        if documents.is_empty() && duplicates.is_empty() {
            return Err(PipelineError::NoDocumentsFound(specifier.to_string()));
        }

        Ok(Discovery {
            documents,
            duplicates,
        })
    }

    /// Resolve the specifier into candidate file paths
    fn candidate_paths(
        &self,
        specifier: &str,
        recursive: bool,
    ) -> Result<Vec<PathBuf>, PipelineError> {
        let path = Path::new(specifier);

        if path.is_file() {
            if self.matches_extension(path) {
                return Ok(vec![path.to_path_buf()]);
            }
            return Err(PipelineError::NoDocumentsFound(specifier.to_string()));
        }

        if path.is_dir() {
            return Ok(self.walk_directory(path, recursive));
        }

        // Neither file nor directory: treat as a glob pattern
        let entries =
            glob::glob(specifier).map_err(|e| PipelineError::InvalidPattern {
                pattern: specifier.to_string(),
                message: e.to_string(),
            })?;

        let mut paths = Vec::new();
        for entry in entries {
            match entry {
                Ok(path) if path.is_file() && self.matches_extension(&path) => paths.push(path),
                Ok(_) => {}
                Err(e) => warn!("Skipping unreadable glob match: {}", e),
            }
        }
        Ok(paths)
    }

    fn walk_directory(&self, root: &Path, recursive: bool) -> Vec<PathBuf> {
        let max_depth = if recursive { usize::MAX } else { 1 };

        WalkDir::new(root)
            .max_depth(max_depth)
            .into_iter()
            .filter_map(|entry| match entry {
                Ok(entry) => Some(entry),
                Err(e) => {
                    warn!("Skipping unreadable entry under '{}': {}", root.display(), e);
                    None
                }
            })
            .filter(|entry| entry.file_type().is_file())
            .map(|entry| entry.into_path())
            .filter(|path| self.matches_extension(path))
            .collect()
    }

    fn matches_extension(&self, path: &Path) -> bool {
        path.extension()
            .map(|ext| ext.to_string_lossy().to_lowercase())
            .map(|ext| self.extensions.iter().any(|allowed| *allowed == ext))
            .unwrap_or(false)
    }
}

impl Default for DocumentSource {
    fn default() -> Self {
        Self::new(vec!["md".to_string(), "markdown".to_string()])
    }
}

/// SHA-256 content fingerprint, lowercase hex
pub(crate) fn fingerprint_bytes(contents: &[u8]) -> Fingerprint {
    let mut hasher = Sha256::new();
    hasher.update(contents);
    Fingerprint::new(format!("{:x}", hasher.finalize()))
}
